pub mod assets;
pub mod build;
pub mod event;
pub mod progress;
pub mod scene;
pub mod step;
pub mod world;
