//! Builder lifecycle, ancilla bookkeeping and execution on the simulator.

use qfsm_adapter_sim::{BitState, SimulatorBackend};
use qfsm_core::{AncillaAllocator, ErrorKind, Fsm, Mode, Outcome, Problem, State};
use qfsm_hal::Backend;

fn fsm(x: &str, y: &str, d: usize, mode: Mode) -> Fsm {
    Fsm::new(Problem::new(x, y, d, mode).unwrap()).unwrap()
}

#[test]
fn test_ancilla_windows_are_disjoint_and_fill_pool() {
    for (x, d) in [("1100", 2), ("11001010", 7), ("1100101011110000", 16)] {
        let fsm = fsm(x, x, d, Mode::FreeSearch);
        let alloc = fsm.ancilla();
        let n = x.len();
        let m = fsm.problem().d_len();

        let windows: Vec<_> = alloc.windows().collect();
        assert_eq!(windows.len(), m);
        for (i, a) in windows.iter().enumerate() {
            for b in &windows[i + 1..] {
                assert!(a.end <= b.start || b.end <= a.start);
            }
        }
        let total: usize = windows.iter().map(|w| w.len()).sum();
        assert_eq!(total, AncillaAllocator::pool_width(n, m));
        assert_eq!(total, fsm.registry().ancilla().len());
    }
}

#[test]
fn test_every_ancilla_returns_to_zero() {
    let mut fsm = fsm("1100101011110000", "1100101111110001", 11, Mode::FreeSearch);
    fsm.build().unwrap();
    let state = BitState::evaluate(fsm.circuit());
    assert!(state.is_clear(fsm.registry().ancilla()));
}

#[test]
fn test_rebuild_reproduces_gate_list() {
    let problem = Problem::builder("11001010", "11101010", 3)
        .mode(Mode::FromPosition)
        .starting_position(4)
        .build()
        .unwrap();
    let mut fsm = Fsm::new(problem).unwrap();
    fsm.build().unwrap();
    let first = fsm.circuit().instructions().to_vec();

    fsm.revert();
    assert!(fsm.circuit().is_empty());
    assert_eq!(fsm.found_cell().unwrap_err().kind(), ErrorKind::State);

    fsm.build().unwrap();
    assert_eq!(fsm.circuit().instructions(), first.as_slice());
}

#[test]
fn test_wrong_mode_accessor() {
    let fsm = fsm("1100", "1110", 2, Mode::FixedPosition);
    let err = fsm.starting_position().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);
    assert!(err.to_string().contains("from mode"));
}

#[test]
fn test_stats_after_build() {
    let mut fsm = fsm("1100", "1110", 2, Mode::FreeSearch);
    assert_eq!(fsm.stats().gates, 0);
    fsm.build().unwrap();
    let stats = fsm.stats();
    assert_eq!(stats.cells, fsm.circuit().num_cells());
    assert!(stats.depth > 0);
    assert_eq!(stats.gate_counts.values().sum::<usize>(), stats.gates);
}

#[tokio::test]
async fn test_execute_scenario() {
    let backend = SimulatorBackend::new();
    let mut fsm = fsm("1100", "1110", 2, Mode::FreeSearch);

    let err = fsm.execute(&backend, 16).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);

    fsm.build().unwrap();
    let counts = fsm.execute(&backend, 16).await.unwrap();
    assert_eq!(counts.get("100100"), 16);
    assert_eq!(fsm.state(), State::Executed);

    let outcome = fsm.outcome().unwrap();
    assert_eq!(
        outcome,
        Outcome {
            found: true,
            positions: vec![0],
        }
    );
    assert_eq!(fsm.execution_result().unwrap().shots, 16);

    fsm.revert();
    assert_eq!(fsm.distribution().unwrap_err().kind(), ErrorKind::State);
}

#[tokio::test]
async fn test_execute_reports_backend_errors() {
    let backend = SimulatorBackend::with_max_cells(8);
    let mut fsm = fsm("1100", "1110", 2, Mode::FixedPosition);
    fsm.build().unwrap();

    assert!(!backend.validate(fsm.circuit()).await.unwrap().is_valid());
    let err = fsm.execute(&backend, 1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Execution);
    assert_eq!(fsm.state(), State::Ready);
}

#[tokio::test]
async fn test_from_position_no_match() {
    let backend = SimulatorBackend::new();
    let problem = Problem::builder("1100", "1110", 2)
        .mode(Mode::FromPosition)
        .starting_position(1)
        .build()
        .unwrap();
    let mut fsm = Fsm::new(problem).unwrap();
    fsm.build().unwrap();
    fsm.execute(&backend, 4).await.unwrap();

    let outcome = fsm.outcome().unwrap();
    assert!(!outcome.found);
    assert!(outcome.positions.is_empty());
}
