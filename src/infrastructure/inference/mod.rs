mod lambda;

pub use lambda::*;
