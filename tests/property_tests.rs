//! Property tests for the numeric invariants.

use proptest::prelude::*;

use dice_duel::cards::{CardCatalog, CardDefinition, CardId, DeckBuilder};
use dice_duel::core::{GameRng, MatchConfig, PlayerId, PlayerState, TurnChoice};
use dice_duel::effects::Vital;
use dice_duel::rules::{Match, ScriptedDecisions};

fn catalog(rarities: &[u8]) -> CardCatalog {
    CardCatalog::from_definitions(rarities.iter().enumerate().map(|(i, rarity)| {
        CardDefinition::new(CardId::new(i as u32 + 1), format!("Card {i}")).with_rarity(*rarity)
    }))
    .unwrap()
}

proptest! {
    /// Deck size always matches the request.
    #[test]
    fn prop_deck_size_exact(
        rarities in prop::collection::vec(0u8..=100, 1..12),
        size in 1usize..80,
        seed in any::<u64>(),
    ) {
        let catalog = catalog(&rarities);
        let deck = DeckBuilder::new().build(&catalog, size, &mut GameRng::new(seed)).unwrap();
        prop_assert_eq!(deck.len(), size);
    }

    /// Recovery never pushes a vital past the cap; losses are never clamped.
    #[test]
    fn prop_commit_clamps_upward_only(hp in -20i64..=10, delta in -30i64..=30) {
        let mut party = PlayerState::new(PlayerId::FIRST, "A", hp, 10, 10);
        party.stage(Vital::Hp, delta);
        party.commit();

        prop_assert!(party.hp <= 10);
        if delta <= 0 {
            prop_assert_eq!(party.hp, hp + delta);
        }
        prop_assert!(party.pending().is_zero());
    }

    /// Action budgets are never negative and hands may always hold two cards.
    #[test]
    fn prop_actions_never_negative(hp in -50i64..=10, debt in 0i64..400) {
        let mut party = PlayerState::new(PlayerId::FIRST, "A", hp, 10, 10);
        party.set_action_debt(debt);
        party.recompute_base_actions();

        prop_assert!(party.base_action_points() >= 2);
        prop_assert!(party.hand_limit() >= 2);
        party.recover_action_debt();
        prop_assert!(party.action_debt() >= 0);
        prop_assert!(party.available_actions() >= 0);
    }

    /// Random matches keep every card and never heal past the cap.
    #[test]
    fn prop_matches_keep_invariants(
        seed in any::<u64>(),
        picks in prop::collection::vec(0usize..7, 1..40),
    ) {
        let mut choices: Vec<TurnChoice> = picks
            .into_iter()
            .map(|pick| if pick == 6 { TurnChoice::EndTurn } else { TurnChoice::Play(pick) })
            .collect();
        choices.push(TurnChoice::Surrender);

        let config = MatchConfig::new().with_seed(seed);
        let mut duel = Match::new(config, ScriptedDecisions::new().with_actions(choices)).unwrap();
        let outcome = duel.run().unwrap();

        prop_assert_ne!(outcome.winner, outcome.loser);
        for party in PlayerId::both() {
            let state = duel.player(party);
            prop_assert_eq!(state.card_count(), 12);
            prop_assert!(state.hp <= 10);
            prop_assert!(state.san <= 10);
            prop_assert!(state.hand().len() <= 60);
        }
    }
}
