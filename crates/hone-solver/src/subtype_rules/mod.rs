pub(crate) mod classes;
pub(crate) mod constraints;
pub(crate) mod functions;
pub(crate) mod shapes;
