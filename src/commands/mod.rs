pub(crate) mod keyboard;
pub(crate) mod listener;
pub(crate) mod touch;
pub(crate) mod wheel;
