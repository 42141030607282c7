pub mod drive;
pub mod smart;
