#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use lull_core::timers::pending_timers;

    use crate::*;

    fn init() -> TestClock {
        let _ = env_logger::builder().is_test(true).try_init();
        TestClock::install()
    }

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_state_tracked_follows_external_value() {
        let _clock = init();
        let external = Rc::new(Cell::new(1));
        let host = {
            let external = external.clone();
            Host::mount(move || use_state_tracked(external.get()))
        };
        assert_eq!(host.output().0, 1);
        // Already in sync on mount: no extra render.
        assert_eq!(host.render_count(), 1);

        for next in [2, 7, 3] {
            external.set(next);
            host.rerender();
            assert_eq!(host.output().0, next);
        }

        host.output().1.set(10);
        flush().unwrap();
        assert_eq!(host.output().0, 10);

        // Unrelated re-render keeps the local value.
        host.rerender();
        assert_eq!(host.output().0, 10);

        external.set(4);
        host.rerender();
        assert_eq!(host.output().0, 4);
    }

    #[test]
    fn test_cached_state_override_until_priority_changes() {
        let _clock = init();
        let priority = Rc::new(RefCell::new("server".to_string()));
        let host = {
            let priority = priority.clone();
            Host::mount(move || use_cached_state(priority.borrow().clone()))
        };
        assert_eq!(host.output().0, "server");

        let (_, set) = host.output();
        set.set("draft".to_string());
        flush().unwrap();
        assert_eq!(host.output().0, "draft");

        *priority.borrow_mut() = "server v2".to_string();
        host.rerender();
        assert_eq!(host.output().0, "server v2");
    }

    #[test]
    fn test_ref_tracked_updates_after_commit_without_render() {
        let _clock = init();
        let external = Rc::new(Cell::new(1));
        let host = {
            let external = external.clone();
            Host::mount(move || {
                let (r, set) = use_ref_tracked(external.get());
                (r.current(), r, set)
            })
        };
        assert_eq!(host.output().0, 1);

        external.set(2);
        host.rerender();
        let (seen_in_render, r, set) = host.output();
        assert_eq!(seen_in_render, 1);
        assert_eq!(r.current(), 2);
        assert_eq!(host.render_count(), 2);

        set.set(5);
        assert_eq!(flush().unwrap(), 0);
        assert_eq!(r.current(), 5);
    }

    fn recorder<T: 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(T) + Clone + 'static) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        (calls, move |v| sink.borrow_mut().push(v))
    }

    #[test]
    fn test_debounced_trigger_calls_once_with_last_value() {
        let clock = init();
        let (calls, record) = recorder::<i32>();
        let host = Host::mount(move || use_debounced_trigger(record.clone(), ms(100)));

        let trigger = host.output();
        trigger.trigger(1);
        clock.advance_ms(5);
        trigger.trigger(2);
        clock.advance_ms(5);
        trigger.trigger(3);
        assert!(calls.borrow().is_empty());

        clock.advance_ms(100);
        assert_eq!(*calls.borrow(), vec![3]);
    }

    #[test]
    fn test_debounced_trigger_survives_rerenders() {
        let clock = init();
        let (calls, record) = recorder::<i32>();
        let host = Host::mount(move || use_debounced_trigger(record.clone(), ms(100)));

        let before = host.output();
        before.trigger(1);
        host.rerender();
        let after = host.output();
        assert!(after.is_pending());
        after.trigger(2);

        clock.advance_ms(100);
        assert_eq!(*calls.borrow(), vec![2]);
    }

    #[test]
    fn test_debounced_trigger_cancelled_on_unmount() {
        let clock = init();
        let (calls, record) = recorder::<i32>();
        let host = Host::mount(move || use_debounced_trigger(record.clone(), ms(100)));

        host.output().trigger(1);
        clock.advance_ms(50);
        host.unmount();
        clock.advance_ms(200);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_keyed_trigger_rebuilds_on_key_change() {
        let clock = init();
        let key = Rc::new(Cell::new(0u32));
        let (calls, record) = recorder::<(u32, i32)>();
        let host = {
            let key = key.clone();
            Host::mount(move || {
                let k = key.get();
                let record = record.clone();
                use_debounced_trigger_with_key(k, move |v: i32| record((k, v)), ms(100))
            })
        };

        let old = host.output();
        old.trigger(1);
        key.set(1);
        host.rerender();
        assert!(!old.is_pending());

        host.output().trigger(2);
        clock.advance_ms(100);
        assert_eq!(*calls.borrow(), vec![(1, 2)]);
    }

    #[test]
    fn test_async_trigger_propagates_callback_errors() {
        let clock = init();
        let host = Host::mount(|| {
            use_async_debounced_trigger(
                |v: i32| async move {
                    if v < 0 {
                        Err(format!("negative: {v}"))
                    } else {
                        Ok(v)
                    }
                },
                ms(100),
            )
        });
        let trigger = host.output();

        let mut superseded = trigger.trigger(1);
        let failing = trigger.trigger(-5);
        assert_eq!(superseded.try_take(), Some(Err(TriggerError::Superseded)));
        clock.advance_ms(100);
        assert_eq!(
            pollster::block_on(failing),
            Ok(Err("negative: -5".to_string()))
        );

        let ok = trigger.trigger(8);
        clock.advance_ms(100);
        assert_eq!(pollster::block_on(ok), Ok(Ok(8)));

        let mut pending = trigger.trigger(9);
        host.unmount();
        assert_eq!(pending.try_take(), Some(Err(TriggerError::Cancelled)));
    }

    #[test]
    fn test_debounced_fn_returns_last_result() {
        let clock = init();
        let host = Host::mount(|| use_debounced_fn(|v: i32| v * 2, ms(50)));
        let f = host.output();

        assert_eq!(f.call(1), None);
        clock.advance_ms(50);
        assert_eq!(f.call(2), Some(2));
        assert!(f.is_pending());

        host.unmount();
        assert!(!f.is_pending());
    }

    #[test]
    fn test_debounced_fn_async_resolves() {
        let clock = init();
        let host = Host::mount(|| use_debounced_fn_async(|v: i32| async move { v + 1 }, ms(50)));
        let call = host.output().call(1);
        clock.advance_ms(50);
        assert_eq!(pollster::block_on(call), Ok(2));
    }

    fn check_debounced_state_effect(memo: bool) {
        let clock = init();
        let (seen, record) = recorder::<Option<i32>>();
        let host = Host::mount(move || {
            use_debounced_state_effect(record.clone(), ms(50), Some(1), memo)
        });
        assert_eq!(host.output().0, Some(1));

        clock.advance_ms(50);
        assert_eq!(*seen.borrow(), vec![Some(1)]);

        let (_, set) = host.output();
        set.set(Some(2));
        flush().unwrap();
        clock.advance_ms(5);
        set.set(Some(3));
        flush().unwrap();
        assert_eq!(host.output().0, Some(3));

        clock.advance_ms(50);
        assert_eq!(*seen.borrow(), vec![Some(1), Some(3)]);

        set.set(None);
        flush().unwrap();
        clock.advance_ms(10);
        host.unmount();
        clock.advance_ms(100);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_debounced_state_effect() {
        check_debounced_state_effect(false);
    }

    #[test]
    fn test_debounced_state_effect_memo_behaves_the_same() {
        check_debounced_state_effect(true);
    }

    fn check_async_debounced_state_effect(memo: bool) {
        let clock = init();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let host = {
            let seen = seen.clone();
            Host::mount(move || {
                let seen = seen.clone();
                use_async_debounced_state_effect(
                    move |v: Option<i32>| {
                        let seen = seen.clone();
                        async move {
                            seen.borrow_mut().push(v);
                            if v == Some(13) { Err("unlucky") } else { Ok(()) }
                        }
                    },
                    ms(50),
                    None,
                    memo,
                )
            })
        };

        clock.advance_ms(50);
        assert_eq!(*seen.borrow(), vec![None]);

        let (_, set) = host.output();
        set.set(Some(13));
        flush().unwrap();
        clock.advance_ms(50);
        assert_eq!(*seen.borrow(), vec![None, Some(13)]);

        set.set(Some(14));
        flush().unwrap();
        clock.advance_ms(50);
        assert_eq!(*seen.borrow(), vec![None, Some(13), Some(14)]);

        // Unmounting resolves the pending call as cancelled; the callback
        // never runs.
        set.set(Some(15));
        flush().unwrap();
        clock.advance_ms(10);
        host.unmount();
        let report = tick().unwrap();
        assert_eq!(report.tasks_completed, 1);
        assert_eq!(pending_timers(), 0);

        clock.advance_ms(100);
        assert_eq!(*seen.borrow(), vec![None, Some(13), Some(14)]);
    }

    #[test]
    fn test_async_debounced_state_effect() {
        check_async_debounced_state_effect(false);
    }

    #[test]
    fn test_async_debounced_state_effect_memo_behaves_the_same() {
        check_async_debounced_state_effect(true);
    }

    fn mount_with_dep<R: 'static>(
        dep: &Rc<Cell<i32>>,
        mut render: impl FnMut(i32) -> R + 'static,
    ) -> Host<R> {
        let dep = dep.clone();
        Host::mount(move || render(dep.get()))
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + Clone + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move || c.set(c.get() + 1))
    }

    #[test]
    fn test_debounced_effect_never_fires_if_unmounted_early() {
        let clock = init();
        let (count, bump) = counter();
        let x = Rc::new(Cell::new(0));
        let host = mount_with_dep(&x, move |x| use_debounced_effect(bump.clone(), ms(50), x));

        for next in 1..=5 {
            clock.advance_ms(2);
            x.set(next);
            host.rerender();
        }
        host.unmount();

        clock.advance_ms(200);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_debounced_effect_fires_once_after_burst() {
        let clock = init();
        let (count, bump) = counter();
        let x = Rc::new(Cell::new(0));
        let host = mount_with_dep(&x, move |x| use_debounced_effect(bump.clone(), ms(50), x));

        for next in 1..=5 {
            clock.advance_ms(2);
            x.set(next);
            host.rerender();
        }
        // Re-rendering with unchanged deps schedules nothing.
        host.rerender();

        clock.advance_ms(50);
        assert_eq!(count.get(), 1);
        clock.advance_ms(200);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_throttled_effect_fires_at_most_once_per_wait() {
        let clock = init();
        let times = Rc::new(RefCell::new(Vec::new()));
        let x = Rc::new(Cell::new(0));
        let host = {
            let times = times.clone();
            mount_with_dep(&x, move |x| {
                let times = times.clone();
                use_throttled_effect(move || times.borrow_mut().push(now()), ms(100), x)
            })
        };
        assert_eq!(times.borrow().len(), 1);

        for next in 1..=30 {
            clock.advance_ms(10);
            x.set(next);
            host.rerender();
        }
        clock.advance_ms(200);

        let times = times.borrow();
        assert!(times.len() >= 3, "{} invocations", times.len());
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= ms(100));
        }
    }

    #[test]
    fn test_layout_variants_run_before_paint() {
        let clock = init();
        let log = Rc::new(RefCell::new(Vec::new()));
        let x = Rc::new(Cell::new(0));
        let host = {
            let log = log.clone();
            mount_with_dep(&x, move |x| {
                let layout = log.clone();
                use_throttled_layout_effect(move || layout.borrow_mut().push("layout"), ms(100), x);
                let passive = log.clone();
                use_throttled_effect(move || passive.borrow_mut().push("passive"), ms(100), x);
            })
        };
        assert_eq!(*log.borrow(), vec!["layout", "passive"]);

        {
            let log = log.clone();
            host.on_paint(move || log.borrow_mut().push("paint"));
        }
        clock.advance_ms(200);
        log.borrow_mut().clear();

        x.set(1);
        host.rerender();
        assert_eq!(*log.borrow(), vec!["layout", "paint", "passive"]);
    }

    #[test]
    fn test_debounced_layout_effect_cancelled_on_unmount() {
        let clock = init();
        let (count, bump) = counter();
        let x = Rc::new(Cell::new(0));
        let host = mount_with_dep(&x, move |x| {
            use_debounced_layout_effect(bump.clone(), ms(50), x)
        });

        clock.advance_ms(50);
        assert_eq!(count.get(), 1);

        x.set(1);
        host.rerender();
        host.unmount();
        clock.advance_ms(100);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_ref_effect_runs_on_dep_change_without_rendering() {
        let _clock = init();
        let (runs, bump) = counter();
        let dep = Rc::new(Cell::new(0));
        let host = mount_with_dep(&dep, move |d| {
            let bump = bump.clone();
            use_ref_effect(
                0,
                move |r, set| {
                    bump();
                    set.set(r.current() + 10);
                },
                d,
            )
        });
        let (r, _) = host.output();
        assert_eq!(runs.get(), 1);
        assert_eq!(r.current(), 10);

        host.rerender();
        assert_eq!(runs.get(), 1);

        dep.set(1);
        host.rerender();
        assert_eq!(runs.get(), 2);
        assert_eq!(r.current(), 20);
        assert_eq!(host.render_count(), 3);
    }

    #[test]
    fn test_empty_ref_effect_starts_empty() {
        let _clock = init();
        let was_empty = Rc::new(Cell::new(false));
        let host = {
            let was_empty = was_empty.clone();
            Host::mount(move || {
                let was_empty = was_empty.clone();
                use_empty_ref_effect::<String, _>(
                    move |r, set| {
                        was_empty.set(r.borrow().is_none());
                        set.set(Some("ready".to_string()));
                    },
                    (),
                )
            })
        };

        assert!(was_empty.get());
        assert_eq!(host.output().0.current(), Some("ready".to_string()));
    }

    #[test]
    fn test_randomize_shrinks_the_value() {
        let _clock = init();
        let host = Host::mount(use_random_state);
        let before = host.output().value;
        assert!((0.0..1.0).contains(&before));

        host.output().randomize();
        flush().unwrap();
        let after = host.output().value;
        assert!(after >= 0.0);
        assert!(after < before || before == 0.0);
    }

    #[test]
    fn test_interval_memo_recomputes_per_interval_without_leaking_timers() {
        let clock = init();
        let (computed, bump) = counter();
        let host = {
            let computed = computed.clone();
            Host::mount(move || {
                let bump = bump.clone();
                let computed = computed.clone();
                use_interval_memo(
                    move || {
                        bump();
                        computed.get()
                    },
                    ms(100),
                )
            })
        };
        assert_eq!(host.output(), 1);
        assert_eq!(pending_timers(), 1);

        clock.advance_ms(350);
        assert_eq!(host.output(), 4);
        assert!(host.render_count() >= 4);
        assert_eq!(pending_timers(), 1);

        host.unmount();
        assert_eq!(pending_timers(), 0);
        clock.advance_ms(300);
        assert_eq!(computed.get(), 4);
    }

    #[test]
    fn test_interval_memo_goes_stale_once_the_value_reaches_zero() {
        let clock = init();
        let (computed, bump) = counter();
        let host = Host::mount(move || {
            let bump = bump.clone();
            use_interval_memo(move || bump(), ms(1))
        });

        // Thousands of draws in [0, 1) drive the product to 0.0.
        clock.advance_ms(4000);
        let settled = computed.get();
        assert!(settled < 4000);

        let renders = host.render_count();
        clock.advance_ms(50);
        assert_eq!(computed.get(), settled);
        assert!(host.render_count() >= renders + 50);
    }
}
