pub mod form_builder;
