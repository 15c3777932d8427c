pub mod badges;
