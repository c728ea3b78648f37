pub(crate) mod transform_map;
