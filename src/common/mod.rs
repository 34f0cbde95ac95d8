pub mod config;
pub mod desktop;
pub mod distro;
pub mod exec;
pub mod package;
pub mod privileges;
pub mod repos;
pub mod shell;
