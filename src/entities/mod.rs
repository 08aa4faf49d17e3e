pub mod prelude;

pub mod recipes;
