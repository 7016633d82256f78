pub mod commit;
pub mod object_id;
pub mod tree;
