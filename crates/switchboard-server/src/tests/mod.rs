pub mod fixtures;

mod builder_tests;
mod dispatch_tests;
mod pagination_tests;
mod prompts_tests;
mod tools_tests;
