pub mod credible_region;
pub mod patterns;
