//! End-to-end tests for ponte. See `tests/`.
