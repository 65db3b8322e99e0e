pub mod contact;
pub mod gunnery;
pub mod movement;
