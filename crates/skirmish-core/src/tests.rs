#[cfg(test)]
mod tests {
    use crate::config::MatchConfig;
    use crate::enums::*;
    use crate::events::MatchEvent;
    use crate::scoring::ScoringData;
    use crate::types::{Position, SimTime, Velocity};

    #[test]
    fn test_position_range() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 0.0);
        assert!((a.range_to(&b) - 5.0).abs() < 1e-10);
        assert!((a.sqr_range_to(&b) - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_velocity_speed() {
        let v = Velocity::new(3.0, 4.0, 0.0);
        assert!((v.speed() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_glam_round_trip() {
        let p = Position::new(1.0, -2.0, 3.5);
        assert_eq!(Position::from_dvec3(p.to_dvec3()), p);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..30 {
            time.advance();
        }
        assert_eq!(time.tick, 30);
        // 30 ticks at 30Hz = 1 second
        assert!((time.elapsed_secs - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_special_kill_states() {
        assert!(AliveState::CleanKill.is_special_kill());
        assert!(AliveState::HeadShot.is_special_kill());
        assert!(AliveState::KillSteal.is_special_kill());
        assert!(!AliveState::AssistedKill.is_special_kill());
        assert!(!AliveState::Dead.is_special_kill());
        assert!(!AliveState::Alive.is_special_kill());
    }

    #[test]
    fn test_gm_kill_reason() {
        assert!(!GmKillReason::None.is_gm_kill());
        assert!(GmKillReason::OutOfAmmo.is_gm_kill());
    }

    #[test]
    fn test_scoring_data_new() {
        let data = ScoringData::new("Alpha");
        assert_eq!(data.team, "Alpha");
        assert!(data.is_alive());
        assert!(!data.has_been_damaged());
        assert!(!data.has_previous_attacker());
        assert_eq!(data.death_order, -1);
        assert!(data.death_time < 0.0);
    }

    #[test]
    fn test_match_config_defaults() {
        let config = MatchConfig::default();
        assert!(config.headshot_window > 0.0);
        assert!(config.killsteal_window > config.headshot_window);
        // Stale clearing happens strictly after the detection window.
        assert!(config.potential_stale_after() > config.potential_window);
    }

    /// Verify the tagged-union wire shape of match events.
    #[test]
    fn test_match_event_serde() {
        let event = MatchEvent::RamAttributed {
            rammer: "Raptor".to_string(),
            rammed: "Mule".to_string(),
            parts_lost: 4,
            head_on: false,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"RamAttributed\""));
        let back: MatchEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(json, serde_json::to_string(&back).unwrap());
    }
}
