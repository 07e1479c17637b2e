pub mod html;
pub mod legend;
pub mod renderer;
