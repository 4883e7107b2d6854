pub(crate) mod accumulate;
pub(crate) mod compositor;
pub(crate) mod sampler;
pub(crate) mod sizing;
pub(crate) mod spherical;
pub(crate) mod weight;
