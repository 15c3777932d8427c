use axum::{
	body::Body,
	http::{header, Response, StatusCode},
};
use thiserror::Error;

use crate::models::badge::BadgeDescriptor;

#[derive(Debug, Error)]
pub enum RespondError {
	#[error("SerializeBadge: {source}")]
	SerializeBadge {
		#[from]
		source: serde_json::Error,
	},

	#[error("BuildResponse: {source}")]
	BuildResponse {
		#[from]
		source: axum::http::Error,
	},
}

/// The whole response body is the descriptor's JSON.
pub fn respond(badge: &BadgeDescriptor) -> Result<Response<Body>, RespondError> {
	let json = serde_json::to_string(badge)?;

	Ok(Response::builder()
		.status(StatusCode::OK)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(json))?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::badge::Status;

	#[tokio::test]
	async fn writes_descriptor_as_json_body() {
		let badge = BadgeDescriptor {
			subject: "Docker pulls".to_string(),
			status: Status::Text("1.2k/month".to_string()),
			color: "blue".to_string(),
		};

		let response = respond(&badge).unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

		let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
		assert_eq!(
			&body[..],
			br#"{"subject":"Docker pulls","status":"1.2k/month","color":"blue"}"#
		);
	}
}
