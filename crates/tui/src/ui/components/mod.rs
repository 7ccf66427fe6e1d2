pub mod card;
pub mod charts;
pub mod hints;
pub mod input;
pub mod markup;
pub mod money;
pub mod tabs;
pub mod toast;
