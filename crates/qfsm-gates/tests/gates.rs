//! Truth-table checks of the gate library on the classical evaluator.

use proptest::prelude::*;
use qfsm_adapter_sim::BitState;
use qfsm_gates::{Application, Gate, GateError, apply, expand, expand_inverse};
use qfsm_ir::{Circuit, Control, Register};

fn circuit_with(widths: &[(&str, usize)]) -> (Circuit, Vec<Register>) {
    let mut circuit = Circuit::new("gates");
    let regs = widths
        .iter()
        .map(|(name, w)| circuit.add_register(*name, *w).unwrap())
        .collect();
    (circuit, regs)
}

fn run(state: &mut BitState, app: &Application) {
    state.run(&expand(app).unwrap());
}

fn bits(n: usize) -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), n)
}

/// Width and extension order with `2^(order-1) < width`.
fn width_and_order() -> impl Strategy<Value = (usize, u32)> {
    (1u32..=4).prop_flat_map(|k| {
        let n = 1usize << k;
        (Just(n), 1u32..=k)
    })
}

proptest! {
    #[test]
    fn prop_extend_is_shifted_conjunction(
        (n, order) in width_and_order(),
        seed in bits(16),
    ) {
        let lambda_bits = &seed[..n];
        let (circuit, regs) = circuit_with(&[("l", n), ("r", n)]);
        let mut state = BitState::for_circuit(&circuit);
        state.load(&regs[0], lambda_bits);

        let app = Application::new(Gate::Extend {
            lambda: regs[0].clone(),
            result: regs[1].clone(),
            order,
        });
        run(&mut state, &app);

        let shift = 1usize << (order - 1);
        let result = state.read(&regs[1]);
        for j in 0..n {
            let expected = j + shift < n && lambda_bits[j] && lambda_bits[j + shift];
            prop_assert_eq!(result[j], expected, "cell {}", j);
        }
        prop_assert_eq!(state.read(&regs[0]), lambda_bits.to_vec());
    }

    #[test]
    fn prop_rotate_moves_cells_up(len in 2usize..18, exp in 0u32..5, seed in bits(18)) {
        let amount = 1usize << exp;
        prop_assume!(amount < len);
        let values = &seed[..len];
        let (circuit, regs) = circuit_with(&[("x", len), ("anc", len / 2)]);
        let mut state = BitState::for_circuit(&circuit);
        state.load(&regs[0], values);

        let app = Application::new(Gate::Rotate {
            target: regs[0].clone(),
            anc: regs[1].clone(),
            amount,
        });
        run(&mut state, &app);

        let rotated = state.read(&regs[0]);
        for j in 0..len {
            prop_assert_eq!(rotated[(j + amount) % len], values[j]);
        }

        state.run(&expand_inverse(&app).unwrap());
        prop_assert_eq!(state.read(&regs[0]), values.to_vec());
    }

    #[test]
    fn prop_rotate_half_twice_restores(k in 1u32..5, seed in bits(16)) {
        let n = 1usize << k;
        let values = &seed[..n];
        let (circuit, regs) = circuit_with(&[("x", n), ("anc", n / 2)]);
        let mut state = BitState::for_circuit(&circuit);
        state.load(&regs[0], values);

        let half = Application::new(Gate::Rotate {
            target: regs[0].clone(),
            anc: regs[1].clone(),
            amount: n / 2,
        });
        run(&mut state, &half);
        run(&mut state, &half);
        prop_assert_eq!(state.read(&regs[0]), values.to_vec());
    }

    #[test]
    fn prop_rotate_complement_restores(k in 1u32..5, exp in 0u32..4, seed in bits(16)) {
        let n = 1usize << k;
        let amount = 1usize << exp;
        prop_assume!(amount < n);
        let values = &seed[..n];
        let (circuit, regs) = circuit_with(&[("x", n), ("anc", n / 2)]);
        let mut state = BitState::for_circuit(&circuit);
        state.load(&regs[0], values);

        let rotate = |amount: usize| {
            Application::new(Gate::Rotate {
                target: regs[0].clone(),
                anc: regs[1].clone(),
                amount,
            })
        };
        run(&mut state, &rotate(amount));

        // n - amount as a sum of powers of two.
        let rest = n - amount;
        for bit in (0..usize::BITS).filter(|b| rest >> b & 1 == 1) {
            run(&mut state, &rotate(1 << bit));
        }
        prop_assert_eq!(state.read(&regs[0]), values.to_vec());
    }

    #[test]
    fn prop_controlled_rotate(len in 2usize..12, exp in 0u32..3, ctrl in any::<bool>(), seed in bits(12)) {
        let amount = 1usize << exp;
        let values = &seed[..len];
        let (circuit, regs) = circuit_with(&[("c", 1), ("x", len), ("anc", len / 2)]);
        let mut state = BitState::for_circuit(&circuit);
        state.load(&regs[0], &[ctrl]);
        state.load(&regs[1], values);

        let app = Application::new(Gate::Rotate {
            target: regs[1].clone(),
            anc: regs[2].clone(),
            amount,
        })
        .controlled_by(Control::positive(regs[0].cell(0).unwrap()));
        run(&mut state, &app);

        let out = state.read(&regs[1]);
        for j in 0..len {
            let expected = if ctrl { values[j] } else { values[(j + amount) % len] };
            prop_assert_eq!(out[(j + amount) % len], expected);
        }
        prop_assert!(state.is_clear(&regs[2]));
    }

    #[test]
    fn prop_unary_or(n in 1usize..12, seed in bits(12)) {
        let values = &seed[..n];
        let (circuit, regs) = circuit_with(&[("x", n), ("r", 1)]);
        let mut state = BitState::for_circuit(&circuit);
        state.load(&regs[0], values);

        let app = Application::new(Gate::UnaryOr {
            source: regs[0].clone(),
            result: regs[1].clone(),
        });
        run(&mut state, &app);

        prop_assert_eq!(state.read(&regs[1])[0], values.iter().any(|&b| b));
        prop_assert_eq!(state.read(&regs[0]), values.to_vec());
    }

    #[test]
    fn prop_match_is_equality(n in 1usize..10, xs in bits(10), ys in bits(10)) {
        let (circuit, regs) = circuit_with(&[("x", n), ("y", n), ("l", n)]);
        let mut state = BitState::for_circuit(&circuit);
        state.load(&regs[0], &xs[..n]);
        state.load(&regs[1], &ys[..n]);

        let app = Application::new(Gate::Match {
            x: regs[0].clone(),
            y: regs[1].clone(),
            result: regs[2].clone(),
        });
        run(&mut state, &app);

        let expected: Vec<bool> = (0..n).map(|i| xs[i] == ys[i]).collect();
        prop_assert_eq!(state.read(&regs[2]), expected);
    }

    #[test]
    fn prop_controlled_cand(
        n in 1usize..10,
        ctrl in any::<bool>(),
        xs in bits(10),
        ys in bits(11),
    ) {
        let (circuit, regs) =
            circuit_with(&[("c", 1), ("x", n), ("y", n + 1), ("anc", n), ("r", n + 1)]);
        let mut state = BitState::for_circuit(&circuit);
        state.load(&regs[0], &[ctrl]);
        state.load(&regs[1], &xs[..n]);
        state.load(&regs[2], &ys[..=n]);

        let app = Application::new(Gate::BitwiseCand {
            x: regs[1].clone(),
            y: regs[2].clone(),
            anc: regs[3].clone(),
            result: regs[4].clone(),
        })
        .controlled_by(Control::positive(regs[0].cell(0).unwrap()));
        run(&mut state, &app);

        let result = state.read(&regs[4]);
        for t in 0..n {
            prop_assert_eq!(result[t], ctrl && xs[t] && ys[t]);
        }
        prop_assert!(!result[n]);
        prop_assert!(state.is_clear(&regs[3]));
    }
}

#[test]
fn test_unary_or_boundaries() {
    for n in [1usize, 4, 9] {
        let (circuit, regs) = circuit_with(&[("x", n), ("r", 1)]);
        let app = Application::new(Gate::UnaryOr {
            source: regs[0].clone(),
            result: regs[1].clone(),
        });

        let mut zero = BitState::for_circuit(&circuit);
        run(&mut zero, &app);
        assert!(!zero.read(&regs[1])[0]);

        for one in 0..n {
            let mut state = BitState::for_circuit(&circuit);
            state.set(regs[0].cell(one).unwrap(), true);
            run(&mut state, &app);
            assert!(state.read(&regs[1])[0], "n={n}, bit {one}");
        }
    }
}

#[test]
fn test_conditional_copy_negative_control() {
    let (circuit, regs) = circuit_with(&[("c", 1), ("s", 3), ("r", 3)]);
    let source = [true, false, true];
    let app = Application::new(Gate::ConditionalCopy {
        source: regs[1].clone(),
        result: regs[2].clone(),
    })
    .controlled_by(Control::negative(regs[0].cell(0).unwrap()));

    let mut copied = BitState::for_circuit(&circuit);
    copied.load(&regs[1], &source);
    run(&mut copied, &app);
    assert_eq!(copied.read(&regs[2]), source.to_vec());

    let mut held = BitState::for_circuit(&circuit);
    held.load(&regs[0], &[true]);
    held.load(&regs[1], &source);
    run(&mut held, &app);
    assert!(held.is_clear(&regs[2]));
}

#[test]
fn test_fanout_broadcasts() {
    let (mut circuit, regs) = circuit_with(&[("src", 1), ("x", 7)]);
    let app = Application::new(Gate::Fanout {
        source: regs[0].clone(),
        target: regs[1].clone(),
    });
    let mut state = BitState::for_circuit(&circuit);
    state.load(&regs[0], &[true]);
    run(&mut state, &app);
    assert_eq!(state.read(&regs[1]), vec![true; 7]);

    apply(&mut circuit, &app).unwrap();
    // One copy from the source plus ⌈log₂ 7⌉ doubling layers.
    assert_eq!(circuit.depth(), 4);
}

#[test]
fn test_reverse_and_set_bits() {
    let (circuit, regs) = circuit_with(&[("d", 5)]);
    let mut state = BitState::for_circuit(&circuit);
    let set = Application::new(Gate::SetBits {
        target: regs[0].clone(),
        bits: vec![true, true, false, false, true],
    });
    let reverse = Application::new(Gate::Reverse {
        target: regs[0].clone(),
    });
    run(&mut state, &set);
    run(&mut state, &reverse);
    assert_eq!(
        state.read(&regs[0]),
        vec![true, false, false, true, true]
    );
}

#[test]
fn test_set_bits_width_mismatch() {
    let (_, regs) = circuit_with(&[("d", 3)]);
    let app = Application::new(Gate::SetBits {
        target: regs[0].clone(),
        bits: vec![true],
    });
    assert!(matches!(
        expand(&app),
        Err(GateError::WidthMismatch { expected: 3, got: 1, .. })
    ));
}
