use crate::cards::{CardCatalog, CardDefinition, CardId, DiceSpec};
use crate::core::{CatalogVariant, ConfigurationError};
use crate::effects::{DirectEffect, EffectTarget, OutcomeTable, RollRange, TerminalEffect, Vital};

/// IDs of the standard cards, in catalog order.
pub mod ids {
    use crate::cards::CardId;

    pub const NORMAL_ATTACK: CardId = CardId::new(1);
    pub const BLOOD_FRENZY: CardId = CardId::new(2);
    pub const WEEKEND_SLACKING: CardId = CardId::new(3);
    pub const SLOW_POTION: CardId = CardId::new(4);
    pub const HASTE_POTION: CardId = CardId::new(5);
    pub const MENTOS_GOD: CardId = CardId::new(6);
    pub const TURTLE_300: CardId = CardId::new(7);
    pub const DEBUG_CARD: CardId = CardId::new(8);
    pub const TWILIGHT_LIZARD: CardId = CardId::new(9);
    pub const CHICKEN_MACHINE: CardId = CardId::new(10);
    pub const GLASSES_FROG: CardId = CardId::new(11);
    pub const QIU_LUO: CardId = CardId::new(12);
    pub const VOID_BOX: CardId = CardId::new(13);
    pub const BLOOD_ARMOR_SNAIL: CardId = CardId::new(14);
    pub const STRAWMAN_FALLACY: CardId = CardId::new(15);
}

/// A dice card whose single range covers the whole die.
fn full_range(id: CardId, name: &str, dice: DiceSpec, effect: TerminalEffect) -> CardDefinition {
    CardDefinition::new(id, name)
        .with_dice(dice)
        .with_outcomes(
            OutcomeTable::new().with_terminal(RollRange::new(dice.min_value, dice.sides), effect),
        )
}

/// Every card definition, Debug Card included.
#[must_use]
pub fn standard_definitions() -> Vec<CardDefinition> {
    vec![
        CardDefinition::new(ids::NORMAL_ATTACK, "Normal Attack")
            .with_description("Deal 1 HP")
            .with_direct(DirectEffect::adjust(EffectTarget::Target, Vital::Hp, -1))
            .with_rarity(20),
        full_range(ids::BLOOD_FRENZY, "Blood Frenzy", DiceSpec::d(6), TerminalEffect::BloodFrenzy)
            .with_description("1-4: 3 HP to the target, 1 SAN to you. 5-6: 2 SAN to you")
            .with_rarity(60),
        full_range(
            ids::WEEKEND_SLACKING,
            "Weekend Slacking",
            DiceSpec::d(7),
            TerminalEffect::WeekendSlacking,
        )
        .with_description("6-7: the target skips their next turn")
        .with_rarity(70),
        CardDefinition::new(ids::SLOW_POTION, "Slow Potion")
            .with_description("Your dice tick slower")
            .with_direct(DirectEffect::SlowPotion)
            .with_rarity(40),
        CardDefinition::new(ids::HASTE_POTION, "Haste Potion")
            .with_description("The target's dice tick faster")
            .with_direct(DirectEffect::HastePotion)
            .with_rarity(40),
        full_range(ids::MENTOS_GOD, "Mentos God", DiceSpec::d(7), TerminalEffect::MentosGod)
            .with_description("Roll to recover SAN, then roll again to recover HP")
            .with_rarity(30),
        CardDefinition::new(ids::TURTLE_300, "Turtle 300")
            .with_description("On a 300, take 300 from the target's HP, SAN or actions")
            .with_dice(DiceSpec::d(300))
            .with_outcomes(OutcomeTable::new().with_terminal(
                RollRange::single(300),
                TerminalEffect::Turtle { amount: 300 },
            ))
            .with_rarity(80),
        CardDefinition::new(ids::DEBUG_CARD, "Debug Card")
            .with_description("Set the value of your next roll")
            .with_direct(DirectEffect::DebugPreset)
            .with_rarity(1),
        CardDefinition::new(ids::TWILIGHT_LIZARD, "Twilight Lizard")
            .with_description("14-16: 1 HP, 17-19: 4 HP, 20-24: 2 HP")
            .with_dice(DiceSpec::ranged(14, 24))
            .with_outcomes(
                OutcomeTable::new()
                    .with_terminal(RollRange::new(14, 16), TerminalEffect::TwilightLizard)
                    .with_terminal(RollRange::new(17, 19), TerminalEffect::TwilightLizard)
                    .with_terminal(RollRange::new(20, 24), TerminalEffect::TwilightLizard),
            )
            .with_rarity(50),
        CardDefinition::new(ids::CHICKEN_MACHINE, "Chicken Machine")
            .with_description("Lose 2 SAN now, regain 5 SAN four turns later")
            .with_direct(DirectEffect::ChickenMachine {
                cost: 2,
                refund: 5,
                delay: 4,
            })
            .with_rarity(65),
        full_range(ids::GLASSES_FROG, "Glasses Frog", DiceSpec::d(10), TerminalEffect::GlassesFrog)
            .with_description("1-5: recover 2 SAN. 6-10: kick the target for 1 HP twice")
            .with_rarity(50),
        CardDefinition::new(ids::QIU_LUO, "Qiu Luo")
            .with_description("The target's next roll shows garbage")
            .with_direct(DirectEffect::QiuLuo)
            .with_rarity(80),
        full_range(ids::VOID_BOX, "Void Box", DiceSpec::d(5), TerminalEffect::VoidBox)
            .with_description("The target's next roll needs 0-2 confirmations")
            .with_rarity(10),
        CardDefinition::new(ids::BLOOD_ARMOR_SNAIL, "Blood Armor Snail")
            .with_description(
                "Deal half your missing HP. On a natural 10, add a third of what you \
                 were missing last time and lose that much SAN",
            )
            .with_direct(DirectEffect::BloodArmorSnail)
            .with_rarity(75),
        CardDefinition::new(ids::STRAWMAN_FALLACY, "Strawman Fallacy")
            .with_description("On a 1, the target's next card does nothing")
            .with_dice(DiceSpec::d(2))
            .with_outcomes(
                OutcomeTable::new().with_terminal(RollRange::single(1), TerminalEffect::Neutralize),
            )
            .with_rarity(70),
    ]
}

/// The validated card pool for `variant`.
///
/// ```
/// use dice_duel::core::CatalogVariant;
/// use dice_duel::games::duel::{ids, standard_catalog};
///
/// let standard = standard_catalog(CatalogVariant::Standard).unwrap();
/// assert!(!standard.contains(ids::DEBUG_CARD));
///
/// let debug = standard_catalog(CatalogVariant::WithDebug).unwrap();
/// assert_eq!(debug.len(), standard.len() + 1);
/// ```
pub fn standard_catalog(variant: CatalogVariant) -> Result<CardCatalog, ConfigurationError> {
    let definitions = standard_definitions()
        .into_iter()
        .filter(|card| variant == CatalogVariant::WithDebug || card.id != ids::DEBUG_CARD);
    CardCatalog::from_definitions(definitions)
}
