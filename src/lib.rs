// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Library entry exposing the formatter and its command-line surface.
pub mod cli;
pub mod formatter;
