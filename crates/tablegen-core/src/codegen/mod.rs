pub mod emit;
pub mod index;
pub mod link;
pub mod module;
pub mod naming;
pub mod typemap;
