use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::ForwarderConfig;
use crate::message::{InboundMessage, MessageId};
use crate::storage::{RocksDbStorage, Storage};

use super::command::EngineCommand;
use super::run::{CancelToken, RunObserver, RunOutcome, RunSummary};
use super::worker::Worker;

mod common;
use common::*;
