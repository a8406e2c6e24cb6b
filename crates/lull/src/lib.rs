//! # Lull hooks
//!
//! Helpers built from the `lull-core` primitives (`use_state`, `use_ref`,
//! `use_memo`, `use_effect`, `use_layout_effect`) and its `debounce` /
//! `throttle`:
//!
//! - tracked state: [`use_state_tracked`], [`use_cached_state`],
//!   [`use_ref_tracked`]
//! - debounced triggers and functions: [`use_debounced_trigger`],
//!   [`use_async_debounced_trigger`], [`use_debounced_fn`],
//!   [`use_debounced_fn_async`]
//! - debounced state effects: [`use_debounced_state_effect`],
//!   [`use_async_debounced_state_effect`]
//! - debounced/throttled effects: [`use_debounced_effect`],
//!   [`use_throttled_effect`] and their layout-phase twins
//! - ref effects: [`use_ref_effect`], [`use_empty_ref_effect`]
//! - forced invalidation: [`use_random_state`], [`use_interval_memo`]
//!
//! ```rust
//! use lull::*;
//!
//! let clock = TestClock::install();
//! let saved = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
//!
//! let host = {
//!     let saved = saved.clone();
//!     Host::mount(move || {
//!         let saved = saved.clone();
//!         use_debounced_trigger(
//!             move |text: String| saved.borrow_mut().push(text),
//!             Duration::from_millis(300),
//!         )
//!     })
//! };
//!
//! let save = host.output();
//! save.trigger("h".into());
//! save.trigger("hi".into());
//! clock.advance_ms(300);
//! assert_eq!(*saved.borrow(), vec!["hi".to_string()]);
//! ```
//!
//! Every wrapper is created on the first render and cancelled when the
//! component unmounts.

pub mod random;
pub mod ref_effect;
pub mod state_effect;
pub mod timed_effect;
pub mod tracked;
pub mod trigger;

mod tests;

pub use lull_core::prelude::*;

pub use random::*;
pub use ref_effect::*;
pub use state_effect::*;
pub use timed_effect::*;
pub use tracked::*;
pub use trigger::*;
