// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod entity;
pub mod forms;
pub mod ids;
pub mod lookup;
pub mod model;
pub mod ports;
pub mod record_form;
pub mod roster;
pub mod session;
pub mod state;
pub mod ticket_form;

pub use entity::*;
pub use ids::*;
pub use lookup::*;
pub use model::*;
pub use ports::*;
pub use record_form::*;
pub use roster::*;
pub use session::*;
pub use state::*;
pub use ticket_form::*;
