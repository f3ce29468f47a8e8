pub mod domain;
pub mod dto;
