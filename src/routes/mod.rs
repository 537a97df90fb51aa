pub mod advisories;
pub mod health;
pub mod mountains;
