pub mod anim;
pub mod body;
pub mod entity;
pub mod physics;
pub mod rules;
