use super::*;

// =============================================================
// Tier
// =============================================================

#[test]
fn tier_parses_case_insensitively() {
    assert_eq!("free".parse::<Tier>(), Ok(Tier::Free));
    assert_eq!(" PRO ".parse::<Tier>(), Ok(Tier::Pro));
    let err = "gold".parse::<Tier>().unwrap_err();
    assert_eq!(err.to_string(), "unknown tier 'gold'");
}

#[test]
fn tier_wire_values() {
    assert_eq!(Tier::Free.as_str(), "Free");
    assert_eq!(Tier::Pro.to_string(), "Pro");
}

#[test]
fn only_pro_uploads_and_sends_model() {
    assert!(!Tier::Free.can_upload());
    assert!(Tier::Pro.can_upload());
    assert!(!Tier::Free.sends_model());
    assert!(Tier::Pro.sends_model());
}

#[test]
fn tier_default_models() {
    assert_eq!(Tier::Free.default_model(), "Chat");
    assert_eq!(Tier::Pro.default_model(), "nvidia/llama3-chatqa-1.5-70b");
    assert_eq!(Tier::Pro.models().len(), 7);
}

#[test]
fn resolve_model_accepts_full_or_short_name() {
    assert_eq!(Tier::Pro.resolve_model("thudm/chatglm3-6b"), Ok("thudm/chatglm3-6b"));
    assert_eq!(Tier::Pro.resolve_model("ChatGLM3-6B"), Ok("thudm/chatglm3-6b"));
    assert_eq!(Tier::Free.resolve_model("image"), Ok("Image"));
}

#[test]
fn resolve_model_rejects_other_tier_models() {
    assert!(Tier::Free.resolve_model("thudm/chatglm3-6b").is_err());
    assert!(Tier::Pro.resolve_model("Chat").is_err());
}

// =============================================================
// Persona
// =============================================================

#[test]
fn persona_round_trips_through_str() {
    for p in Persona::ALL {
        assert_eq!(p.as_str().parse::<Persona>(), Ok(p));
    }
    assert_eq!("friendly".parse::<Persona>(), Ok(Persona::Friendly));
    assert!("Pirate".parse::<Persona>().is_err());
}

// =============================================================
// Preferences
// =============================================================

#[test]
fn preferences_default_to_free_tutor_chat() {
    let p = Preferences::default();
    assert_eq!(p.tier, Tier::Free);
    assert_eq!(p.persona, Persona::Tutor);
    assert_eq!(p.model, "Chat");
    assert!(!p.agent_mode);
}

#[test]
fn set_tier_resets_model_not_offered() {
    let mut p = Preferences::default();
    p.set_tier(Tier::Pro);
    assert_eq!(p.model, "nvidia/llama3-chatqa-1.5-70b");
    p.set_model("breeze-7b-instruct").unwrap();
    p.set_tier(Tier::Pro);
    assert_eq!(p.model, "mediatek/breeze-7b-instruct");
    p.set_tier(Tier::Free);
    assert_eq!(p.model, "Chat");
}

#[test]
fn set_model_rejects_unknown_and_keeps_previous() {
    let mut p = Preferences::default();
    assert!(p.set_model("gpt-9").is_err());
    assert_eq!(p.model, "Chat");
}

#[test]
fn preferences_deserialize_with_missing_fields() {
    let p: Preferences = serde_json::from_str(r#"{"tier":"Pro"}"#).unwrap();
    assert_eq!(p.tier, Tier::Pro);
    assert_eq!(p.model, "Chat");
    let mut p = p;
    p.normalize();
    assert_eq!(p.model, "nvidia/llama3-chatqa-1.5-70b");
}
