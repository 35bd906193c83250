//! Integration tests for reading and writing models through a schema.

mod associations;
mod model_attrs;
mod model_writes;
mod read_all;
mod read_find;
mod read_first;
mod read_where;
mod support;
