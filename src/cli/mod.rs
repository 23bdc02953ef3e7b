pub mod command;
pub mod decode;
pub mod encode;
pub mod info;
pub mod mix;
pub mod output;
pub mod progress;
