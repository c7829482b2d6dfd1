pub mod audio;
pub mod explain;
pub mod health;
pub mod lesson;
pub mod quiz;
