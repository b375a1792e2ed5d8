pub mod burning_ship;
pub mod escape;
pub mod fractal_family;
pub mod julia;
pub mod mandelbrot;
pub mod newton;
pub mod tricorn;
