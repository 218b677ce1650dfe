pub mod composer;
pub mod history;
pub mod template;
