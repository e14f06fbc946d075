pub mod rejection_mapper;
