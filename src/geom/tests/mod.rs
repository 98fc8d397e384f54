mod test_surface_fit_basic;
mod test_wing_basic;
