
pub mod image;
pub mod filter;
pub mod frequency;
pub mod corner;
pub mod blob;
pub mod visualize;

macro_rules! define_float {
    ($f:tt) => {
        pub use std::$f as float;
        pub type Float = $f;
    }
}

define_float!(f64);

#[derive(Debug,Clone)]
pub struct ExtremaParameters {
    pub x: usize,
    pub y: usize,
    pub sigma_level: usize
}

#[derive(Debug,Clone)]
pub struct Blob {
    pub y: Float,
    pub x: Float,
    pub sigma: Float
}

impl Blob {
    pub fn radius(&self) -> Float {
        self.sigma*(2.0 as Float).sqrt()
    }
}
