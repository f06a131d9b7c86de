pub mod analyzer;
pub mod convert;
pub mod dict;
pub mod division;
pub mod phonology;
pub mod render;
pub mod resolver;
pub mod romaji;
pub mod unicode;
pub mod worker;
