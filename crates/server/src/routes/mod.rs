pub mod game;
pub mod health;
pub mod menu;
pub mod voice;
pub mod voice_ws;
