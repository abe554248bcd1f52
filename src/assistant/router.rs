//! Ordered rule-chain dispatch for the chat assistant. Classification is a
//! pure function over the lowercased message returning a tagged [`Intent`];
//! dispatch consumes read-only fridge/recipe snapshots captured before
//! routing begins. The rule order is a contract: the first matching rule
//! short-circuits every later one.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::ai::{GenerationClient, GenerationError};
use crate::assistant::meal_time::MealHint;
use crate::assistant::prompts;
use crate::fridge::repo::Ingredient;
use crate::recipes::repo::Recipe;

const RECIPE_LIST_LIMIT: usize = 12;
const CREATIVE_IDEA_COUNT: usize = 2;

/// Any of these marks a message as culinary; a message with none of them is
/// handed to the open-domain chat branch. Substring matching on purpose, not
/// word-boundary aware: a keyword inside a longer word still counts.
const CULINARY_KEYWORDS: &[&str] = &[
    "reteta",
    "rețetă",
    "rețete",
    "ingrediente",
    "fridge",
    "frigider",
    "ce pot gati",
    "ce pot găti",
    "ce gătesc",
    "mic dejun",
    "cina",
    "cină",
    "prânz",
    "pranz",
    "gatit",
    "meniu",
    "micul dejun",
    "propuneri",
    "sugestii",
    "idee de cina",
    "idee de pranz",
];

const COOK_KEYWORDS: &[&str] = &[
    "reteta",
    "rețetă",
    "gati",
    "găti",
    "gatesc",
    "gătesc",
    "pot face",
    "fa-mi",
    "fă-mi",
    "pregateste",
    "pregătește",
];

const MEAL_KEYWORDS: &[&str] = &[
    "mic dejun",
    "breakfast",
    "pranz",
    "prânz",
    "cina",
    "cină",
    "masa",
    "pranzul",
];

const RECIPE_TRIGGERS: &[&str] = &[
    "cum fac",
    "reteta ",
    "rețeta ",
    "o reteta cu",
    "o rețetă cu",
    "idee de cina",
    "idee de pranz",
    "idee de cină",
    "idee de prânz",
    "vreau reteta",
    "vreau o reteta",
    "vreau doua retete",
    "vreau două rețete",
    "doua retete",
    "două rețete",
    "retete de",
    "rețete de",
    "reteta de",
    "rețeta de",
];

const LIST_RECIPES_TRIGGERS: &[&str] = &[
    "toate rețetele",
    "toate retetele",
    "lista rețete",
    "lista retete",
    "arată rețetele",
    "arata retetele",
];

const LIST_FRIDGE_TRIGGERS: &[&str] = &["ce am in frigider", "ce am în frigider", "lista frigider"];

lazy_static! {
    // Deliberately narrow: unaccented "cate" and the exact "<word> am" shape.
    // Broadening it would silently move ambiguous messages out of the
    // branches below, so it stays as is.
    static ref COUNT_RE: Regex = Regex::new(r"cate ([a-zăîâșț]+) am").unwrap();
}

/// Tagged routing decision, consumed by [`route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    CountQuery(String),
    FridgeSuggestion,
    CreativeRecipe,
    ListAllRecipes,
    ListFridge,
    OpenChat,
    CulinaryFallback,
}

fn contains_any(msg: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| msg.contains(k))
}

/// Classify a lowercased, trimmed message. Pure; no snapshots needed.
pub fn classify(msg: &str) -> Intent {
    if let Some(caps) = COUNT_RE.captures(msg) {
        return Intent::CountQuery(caps[1].to_string());
    }

    let has_fridge_hint =
        msg.contains("cu ce am") || msg.contains("din frigider") || msg.contains("frigider");
    // Both halves are required: a bare fridge mention with no cooking action
    // or meal name falls through to the later branches.
    if has_fridge_hint && (contains_any(msg, COOK_KEYWORDS) || contains_any(msg, MEAL_KEYWORDS)) {
        return Intent::FridgeSuggestion;
    }

    if contains_any(msg, RECIPE_TRIGGERS) {
        return Intent::CreativeRecipe;
    }
    if contains_any(msg, LIST_RECIPES_TRIGGERS) {
        return Intent::ListAllRecipes;
    }
    if contains_any(msg, LIST_FRIDGE_TRIGGERS) {
        return Intent::ListFridge;
    }
    if !contains_any(msg, CULINARY_KEYWORDS) {
        return Intent::OpenChat;
    }
    Intent::CulinaryFallback
}

/// Produce the final user-visible reply for one chat turn. Always returns a
/// non-empty Romanian string; generation failures are converted here, never
/// propagated.
pub async fn route(
    message: &str,
    fridge: &[Ingredient],
    recipes: &[Recipe],
    hour: u8,
    ai: &dyn GenerationClient,
) -> String {
    let msg = message.trim().to_lowercase();
    let hint = MealHint::infer(hour, &msg);
    let intent = classify(&msg);
    debug!(?intent, ?hint, "message classified");

    match intent {
        Intent::CountQuery(term) => how_many(fridge, &term),
        Intent::FridgeSuggestion => match suggest(fridge, recipes, hint, ai).await {
            Ok(text) => text,
            Err(e) => format!("A apărut o problemă la generarea rețetelor cu Gemini. Detalii: {e}"),
        },
        Intent::CreativeRecipe => {
            match ai
                .generate(&prompts::creative_recipes(message, CREATIVE_IDEA_COUNT))
                .await
            {
                Ok(text) => text,
                Err(e) => format!("Nu am putut genera răspunsul cu Gemini acum. Detalii: {e}"),
            }
        }
        Intent::ListAllRecipes => list_all_recipes(recipes),
        Intent::ListFridge => format!("Iată ce ai: {}", list_items(fridge)),
        Intent::OpenChat => match ai.generate(&prompts::open_chat(message)).await {
            Ok(text) => text,
            Err(e) => {
                // Incidental branch: the failure stays out of the reply.
                debug!(error = %e, "open chat generation failed, using canned reply");
                "Bună! Spune-mi orice dorești, discutăm!".to_string()
            }
        },
        Intent::CulinaryFallback => match suggest(fridge, recipes, hint, ai).await {
            Ok(text) => text,
            Err(e) => format!("Serverul AI este ocupat sau a apărut o eroare. Detalii: {e}"),
        },
    }
}

async fn suggest(
    fridge: &[Ingredient],
    recipes: &[Recipe],
    hint: MealHint,
    ai: &dyn GenerationClient,
) -> Result<String, GenerationError> {
    let names: Vec<String> = fridge.iter().map(|i| i.name.clone()).collect();
    ai.generate(&prompts::meal_suggestions(&names, recipes, hint))
        .await
}

fn list_items(fridge: &[Ingredient]) -> String {
    if fridge.is_empty() {
        return "Frigiderul este gol.".to_string();
    }
    fridge
        .iter()
        .map(|i| format!("{} ({} {})", i.name, i.quantity, i.unit))
        .collect::<Vec<_>>()
        .join(", ")
}

fn how_many(fridge: &[Ingredient], term: &str) -> String {
    let needle = fold_diacritics(&term.to_lowercase());
    match fridge
        .iter()
        .find(|i| fold_diacritics(&i.name.to_lowercase()).contains(&needle))
    {
        Some(item) => format!("Ai {} {} de {}.", item.quantity, item.unit, item.name),
        None => format!("Nu am găsit '{term}' în frigiderul tău."),
    }
}

fn list_all_recipes(recipes: &[Recipe]) -> String {
    if recipes.is_empty() {
        return "Nu ai rețete salvate încă. Spune-mi ce masă dorești și îți propun idei generale."
            .to_string();
    }
    let names: Vec<&str> = recipes
        .iter()
        .take(RECIPE_LIST_LIMIT)
        .map(|r| r.name.as_str())
        .collect();
    let extra = if recipes.len() > RECIPE_LIST_LIMIT {
        format!(" (+{} rețete)", recipes.len() - RECIPE_LIST_LIMIT)
    } else {
        String::new()
    };
    format!("Rețetele tale: {}{}", names.join(", "), extra)
}

/// The count query arrives unaccented, the stored names usually carry
/// diacritics. Folding both sides keeps "oua" matching "ouă".
fn fold_diacritics(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'ă' | 'â' => 'a',
            'î' => 'i',
            'ș' => 's',
            'ț' => 't',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use uuid::Uuid;

    /// Deterministic stub: replies with a fingerprint of the prompt.
    struct EchoAi;

    #[async_trait]
    impl GenerationClient for EchoAi {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            Ok(format!("gen[{}]", prompt.len()))
        }
    }

    /// Stub that always fails terminally with the given detail.
    struct FailAi(&'static str);

    #[async_trait]
    impl GenerationClient for FailAi {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Err(GenerationError::new(Some(500), self.0.to_string()))
        }
    }

    fn item(name: &str, quantity: f64, unit: &str) -> Ingredient {
        Ingredient {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
        }
    }

    fn recipe(name: &str) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            instructions: String::new(),
            ingredients: vec!["ou".into(), "faina".into()],
        }
    }

    #[test]
    fn count_query_precedes_every_other_branch() {
        // Matches the count pattern and several culinary keywords at once;
        // the count branch must win.
        assert_eq!(
            classify("cate oua am, ce pot gati din frigider?"),
            Intent::CountQuery("oua".into())
        );
    }

    #[test]
    fn bare_fridge_mention_is_not_a_fridge_request() {
        assert_eq!(classify("frigider"), Intent::CulinaryFallback);
        assert_eq!(classify("am un frigider nou"), Intent::CulinaryFallback);
    }

    #[test]
    fn fridge_marker_plus_cooking_keyword_is_a_fridge_request() {
        assert_eq!(classify("ce pot gati din frigider?"), Intent::FridgeSuggestion);
        assert_eq!(classify("cu ce am, fa-mi ceva bun"), Intent::FridgeSuggestion);
        assert_eq!(classify("cina din frigider"), Intent::FridgeSuggestion);
    }

    #[test]
    fn creative_triggers_ignore_inventory_branch() {
        assert_eq!(classify("cum fac sarmale?"), Intent::CreativeRecipe);
        assert_eq!(classify("vreau reteta de clatite"), Intent::CreativeRecipe);
        assert_eq!(classify("idee de cina rapida"), Intent::CreativeRecipe);
    }

    #[test]
    fn list_requests_classify_before_fallback() {
        assert_eq!(classify("toate retetele"), Intent::ListAllRecipes);
        assert_eq!(classify("arata retetele mele"), Intent::ListAllRecipes);
        assert_eq!(classify("ce am in frigider"), Intent::ListFridge);
        assert_eq!(classify("ce am în frigider?"), Intent::ListFridge);
    }

    #[test]
    fn non_culinary_goes_to_open_chat() {
        assert_eq!(classify("cum e vremea azi?"), Intent::OpenChat);
        assert_eq!(classify("spune-mi o gluma"), Intent::OpenChat);
    }

    #[test]
    fn culinary_without_other_match_falls_back() {
        assert_eq!(classify("vreau un meniu sanatos"), Intent::CulinaryFallback);
    }

    #[tokio::test]
    async fn count_reply_names_quantity_unit_and_item() {
        let fridge = vec![item("ouă", 6.0, "buc")];
        let reply = route("cate oua am", &fridge, &[], 12, &FailAi("nope")).await;
        assert!(reply.contains('6'), "{reply}");
        assert!(reply.contains("buc"), "{reply}");
        assert!(reply.contains("ouă"), "{reply}");
        // Never reaches the AI, so the stub's detail cannot leak.
        assert!(!reply.contains("nope"), "{reply}");
    }

    #[tokio::test]
    async fn count_miss_names_the_queried_term() {
        let reply = route("cate branza am", &[], &[], 12, &EchoAi).await;
        assert!(reply.contains("Nu am găsit"), "{reply}");
        assert!(reply.contains("branza"), "{reply}");
    }

    #[tokio::test]
    async fn empty_fridge_listing() {
        let reply = route("ce am in frigider", &[], &[], 12, &EchoAi).await;
        assert_eq!(reply, "Iată ce ai: Frigiderul este gol.");
    }

    #[tokio::test]
    async fn fridge_listing_formats_name_quantity_unit() {
        let fridge = vec![item("lapte", 1.0, "l")];
        let reply = route("ce am in frigider", &fridge, &[], 12, &EchoAi).await;
        assert!(reply.contains("lapte (1 l)"), "{reply}");
    }

    #[tokio::test]
    async fn empty_catalog_invites_a_general_request() {
        let reply = route("toate retetele", &[], &[], 12, &EchoAi).await;
        assert!(reply.contains("Nu ai rețete salvate încă"), "{reply}");
        assert!(!reply.is_empty());
    }

    #[tokio::test]
    async fn catalog_listing_caps_at_twelve_names() {
        let recipes: Vec<Recipe> = (1..=14).map(|i| recipe(&format!("R{i}"))).collect();
        let reply = route("toate retetele", &[], &recipes, 12, &EchoAi).await;
        assert!(reply.starts_with("Rețetele tale: "), "{reply}");
        assert!(reply.contains("R12"), "{reply}");
        assert!(!reply.contains("R13"), "{reply}");
        assert!(reply.ends_with("(+2 rețete)"), "{reply}");
    }

    #[tokio::test]
    async fn open_chat_failure_hides_the_detail() {
        let reply = route("cum e vremea azi?", &[], &[], 12, &FailAi("kaboom")).await;
        assert_eq!(reply, "Bună! Spune-mi orice dorești, discutăm!");
    }

    #[tokio::test]
    async fn culinary_fallback_failure_embeds_the_detail() {
        let reply = route("vreau un meniu sanatos", &[], &[], 12, &FailAi("kaboom")).await;
        assert!(reply.contains("Serverul AI este ocupat"), "{reply}");
        assert!(reply.contains("kaboom"), "{reply}");
    }

    #[tokio::test]
    async fn fridge_branch_failure_embeds_the_detail() {
        let reply = route(
            "ce pot gati din frigider?",
            &[item("lapte", 1.0, "l")],
            &[],
            12,
            &FailAi("rate limited"),
        )
        .await;
        assert!(reply.contains("la generarea rețetelor"), "{reply}");
        assert!(reply.contains("rate limited"), "{reply}");
    }

    #[tokio::test]
    async fn creative_branch_failure_embeds_the_detail() {
        let reply = route("cum fac sarmale?", &[], &[], 12, &FailAi("boom")).await;
        assert!(reply.contains("Nu am putut genera răspunsul"), "{reply}");
        assert!(reply.contains("boom"), "{reply}");
    }

    #[tokio::test]
    async fn routing_is_idempotent_with_a_deterministic_stub() {
        let fridge = vec![item("cartofi", 3.0, "kg")];
        let recipes = vec![recipe("Tocăniță")];
        let a = route("ce pot gati din frigider?", &fridge, &recipes, 19, &EchoAi).await;
        let b = route("ce pot gati din frigider?", &fridge, &recipes, 19, &EchoAi).await;
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }
}
