/// Phase of an encounter, including the menu sub-phases layered on top of
/// the action phase by multi-step UI flows.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    #[default]
    #[strum(serialize = "inizializzazione")]
    #[cfg_attr(feature = "serde", serde(rename = "inizializzazione"))]
    Initializing,
    #[strum(serialize = "iniziativa")]
    #[cfg_attr(feature = "serde", serde(rename = "iniziativa"))]
    Initiative,
    #[strum(serialize = "azione")]
    #[cfg_attr(feature = "serde", serde(rename = "azione"))]
    Action,
    #[strum(serialize = "scelta")]
    #[cfg_attr(feature = "serde", serde(rename = "scelta"))]
    Choice,
    #[strum(serialize = "usa_oggetto")]
    #[cfg_attr(feature = "serde", serde(rename = "usa_oggetto"))]
    UseItem,
    #[strum(serialize = "cambio_equip_tipo")]
    #[cfg_attr(feature = "serde", serde(rename = "cambio_equip_tipo"))]
    EquipSlot,
    #[strum(serialize = "cambio_equip_item")]
    #[cfg_attr(feature = "serde", serde(rename = "cambio_equip_item"))]
    EquipItem,
    #[strum(serialize = "seleziona_bersaglio")]
    #[cfg_attr(feature = "serde", serde(rename = "seleziona_bersaglio"))]
    SelectTarget,
    #[strum(serialize = "terminato")]
    #[cfg_attr(feature = "serde", serde(rename = "terminato"))]
    Ended,
}

impl Phase {
    /// Sub-phases of the action phase driven by menus.
    pub fn is_menu(&self) -> bool {
        matches!(
            self,
            Self::Choice | Self::UseItem | Self::EquipSlot | Self::EquipItem | Self::SelectTarget
        )
    }

    /// Phases in which the current combatant may act.
    pub fn accepts_actions(&self) -> bool {
        *self == Self::Action || self.is_menu()
    }
}
