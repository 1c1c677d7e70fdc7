use proptest::prelude::*;
use rpncalc::{Machine, Stack};

fn stack_of(tokens: &[i64]) -> Stack {
    tokens.iter().map(|n| n.to_string()).collect()
}

fn ops(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

proptest! {
    #[test]
    fn numeric_literals_evaluate_to_themselves(x in -1.0e9f64..1.0e9f64) {
        let token = x.to_string();
        let result = Machine::new()
            .evaluate(&[token.clone()], Vec::new())
            .unwrap();
        prop_assert_eq!(result, vec![token]);
    }

    #[test]
    fn dup_then_drop_is_identity(values in prop::collection::vec(-1000i64..1000, 1..8)) {
        let stack = stack_of(&values);
        let result = Machine::new()
            .evaluate(&ops(&["dup", "drop"]), stack.clone())
            .unwrap();
        prop_assert_eq!(result, stack);
    }

    #[test]
    fn swap_twice_is_identity(values in prop::collection::vec(-1000i64..1000, 2..8)) {
        let stack = stack_of(&values);
        let result = Machine::new()
            .evaluate(&ops(&["swap", "swap"]), stack.clone())
            .unwrap();
        prop_assert_eq!(result, stack);
    }

    #[test]
    fn roll_then_rot_is_identity(values in prop::collection::vec(-1000i64..1000, 1..8)) {
        let stack = stack_of(&values);
        let result = Machine::new()
            .evaluate(&ops(&["roll", "rot"]), stack.clone())
            .unwrap();
        prop_assert_eq!(result, stack);
    }

    #[test]
    fn subtraction_uses_push_order(a in -1000i64..1000, b in -1000i64..1000) {
        let program = vec![a.to_string(), b.to_string(), "-".to_string()];
        let result = Machine::new().evaluate(&program, Vec::new()).unwrap();
        prop_assert_eq!(result, vec![(a - b).to_string()]);
    }

    #[test]
    fn store_round_trips(value in -1000i64..1000) {
        let mut machine = Machine::new();
        let initial = vec!["reg".to_string(), value.to_string()];
        let emptied = machine
            .evaluate(&ops(&["store"]), initial)
            .unwrap();
        prop_assert_eq!(emptied, Vec::<String>::new());

        let recalled = machine.evaluate(&ops(&["reg"]), Vec::new()).unwrap();
        prop_assert_eq!(recalled, vec![value.to_string()]);
    }
}
