#[cfg(test)]
mod model_tests {
    use jiff::{SignedDuration, Timestamp};

    use crate::{
        models::{BrewPlan, BrewSession, Roast, SessionSnapshot, SessionState, StepKind},
        params::BrewParams,
    };

    fn amounts(plan: &BrewPlan) -> Vec<f64> {
        plan.iter().map(|s| s.cumulative_target_amount).collect()
    }

    fn waits(plan: &BrewPlan) -> Vec<Option<i128>> {
        plan.iter()
            .map(|s| s.wait_duration.map(|w| w.as_millis()))
            .collect()
    }

    #[test]
    fn test_roast_table() {
        assert_eq!(
            Roast::Medium.steps(),
            &[StepKind::SHORT, StepKind::LONG, StepKind::LONG]
        );
        assert_eq!(Roast::Dark.steps(), &[StepKind::SHORT; 4]);
        assert_eq!(Roast::Medium.amount_adjustment(), 0.8);
        assert_eq!(Roast::Dark.amount_adjustment(), 1.0);
    }

    #[test]
    fn test_roast_from_str_and_display() {
        assert_eq!("medium".parse::<Roast>().unwrap(), Roast::Medium);
        assert_eq!("DARK".parse::<Roast>().unwrap(), Roast::Dark);
        assert!("light".parse::<Roast>().is_err());
        for roast in Roast::ALL {
            assert_eq!(roast.to_string().parse::<Roast>().unwrap(), roast);
        }
    }

    #[test]
    fn test_medium_plan() {
        let plan = BrewPlan::build("20", Roast::Medium);

        assert_eq!(plan.effective_mass(), 16.0);
        assert_eq!(amounts(&plan), vec![80.0, 200.0, 320.0]);
        assert_eq!(waits(&plan), vec![Some(120_000), Some(180_000), None]);
        assert_eq!(plan.total_wait(), SignedDuration::from_secs(300));
        assert!(plan[2].is_final);
        assert!(!plan[0].is_final && !plan[1].is_final);
    }

    #[test]
    fn test_dark_plan() {
        let plan = BrewPlan::build("10", Roast::Dark);

        assert_eq!(amounts(&plan), vec![50.0, 100.0, 150.0, 200.0]);
        assert_eq!(
            waits(&plan),
            vec![Some(120_000), Some(120_000), Some(120_000), None]
        );
        assert_eq!(plan.last_index(), 3);
        assert_eq!(plan.wait_before(2), SignedDuration::from_secs(240));
    }

    #[test]
    fn test_partial_mass_matches_zero() {
        for roast in Roast::ALL {
            let zero = BrewPlan::build("0", roast);
            assert_eq!(BrewPlan::build("", roast), zero);
            assert_eq!(BrewPlan::build(".", roast), zero);
            assert!(zero.iter().all(|s| s.cumulative_target_amount == 0.0));
            assert_eq!(zero.len(), roast.steps().len());
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let first = BrewPlan::build("17.3", Roast::Medium);
        let second = BrewPlan::build("17.3", Roast::Medium);
        assert_eq!(first, second);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(
                a.cumulative_target_amount.to_bits(),
                b.cumulative_target_amount.to_bits()
            );
        }
    }

    #[test]
    fn test_custom_wait_unit() {
        let plan = BrewPlan::build_with_unit("10", Roast::Medium, SignedDuration::from_secs(5));
        assert_eq!(waits(&plan), vec![Some(10_000), Some(15_000), None]);

        let params = BrewParams::new("10", Roast::Medium);
        assert_eq!(
            BrewPlan::from_params(&params, SignedDuration::from_secs(5)),
            plan
        );
    }

    #[test]
    fn test_step_starts_at() {
        let plan = BrewPlan::build("20", Roast::Medium);
        let start = Timestamp::from_second(1_700_000_000).unwrap();

        assert_eq!(plan.step_starts_at(start, 0), start);
        assert_eq!(
            plan.step_starts_at(start, 2),
            start + SignedDuration::from_secs(300)
        );

        let late = Timestamp::MAX - SignedDuration::from_secs(60);
        assert_eq!(plan.step_starts_at(late, 1), Timestamp::MAX);
    }

    #[test]
    fn test_total_wait_factor() {
        assert_eq!(Roast::Medium.total_wait_factor(), 5);
        assert_eq!(Roast::Dark.total_wait_factor(), 6);
        for roast in Roast::ALL {
            let plan = BrewPlan::build("10", roast);
            assert_eq!(
                plan.total_wait(),
                SignedDuration::from_mins(i64::from(roast.total_wait_factor()))
            );
        }
    }

    #[test]
    fn test_session_lifecycle_helpers() {
        let start = Timestamp::from_second(1_700_000_000).unwrap();

        assert!(!BrewSession::default().is_running());
        assert!(!BrewSession::started(start).needs_tick());
        assert!(BrewSession::restored(start).needs_tick());
        assert!(BrewSession::restored(start).config_locked);
    }

    #[test]
    fn test_session_state_parsing() {
        assert_eq!("running".parse::<SessionState>().unwrap(), SessionState::Running);
        assert!("paused".parse::<SessionState>().is_err());
        assert!(SessionState::Completing.is_active());
        assert!(!SessionState::Idle.is_active());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = SessionSnapshot {
            params: BrewParams::new("20", Roast::Medium),
            started_at: None,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["bean_mass"], "20");
        assert_eq!(json["roast"], "medium");
        assert!(json.get("started_at").is_none());

        let decoded: SessionSnapshot =
            serde_json::from_str(r#"{"bean_mass":"12","roast":"dark"}"#).unwrap();
        assert_eq!(decoded.params, BrewParams::new("12", Roast::Dark));
        assert_eq!(decoded.started_at, None);
    }
}
