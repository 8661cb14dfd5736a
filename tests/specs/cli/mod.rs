// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod common;
mod completion;
mod entries;
mod flags;
mod init;
mod run;
mod status;
mod sync;
