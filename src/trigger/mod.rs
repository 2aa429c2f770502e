// SPDX-License-Identifier: GPL-3.0-or-later
mod manual;
mod switch;

pub(crate) use manual::capture_once;
pub(crate) use switch::{forward_presses, SwitchLoop};
