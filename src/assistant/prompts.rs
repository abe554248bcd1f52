//! Prompt construction for the Gemini calls. The texts are the content
//! contract with the generation service: persona preamble, context block and
//! explicit formatting requirements, all in Romanian.

use crate::assistant::meal_time::MealHint;
use crate::recipes::repo::Recipe;

pub const BASE_SYSTEM_INSTRUCTION: &str = "\
Ești Chef Asistent (ChefGPT), un agent culinar prietenos și practic.

Reguli generale:
- Răspunde în română, clar și concis; preferă bullet points și pași numerotați.
- Întreabă doar când e necesar (alergii, timp, câți oameni mănâncă).
- Sugerează 1–3 rețete relevante, nu te opri niciodată doar la listarea ingredientelor.
- Include timp total, dificultate, pași (1..N), și opțional listă scurtă de cumpărături/înlocuiri.

Scenarii:
- Cu inventar (din frigider): folosește DOAR ingredientele date ca bază; marchează clar ce lipsește și oferă alternative.
- Fără inventar (cerere tip „cum fac X?” sau „idee de cină rapidă”): răspunde direct cu rețeta/ideile cerute, fără a cere inventarul.
";

/// Fridge-aware suggestion prompt: inventory, the user's saved recipes and the
/// target meal, followed by the structural requirements on the answer.
pub fn meal_suggestions(fridge_names: &[String], recipes: &[Recipe], hint: MealHint) -> String {
    let inventory = if fridge_names.is_empty() {
        "—".to_string()
    } else {
        fridge_names.join(", ")
    };

    let recipe_lines = if recipes.is_empty() {
        "- (niciuna)".to_string()
    } else {
        recipes
            .iter()
            .map(|r| format!("- {}: {}", r.name, r.ingredients.join(", ")))
            .collect::<Vec<_>>()
            .join("\n  ")
    };

    let meal_line = match hint.as_str() {
        Some(meal) => format!("Masa vizată: {meal}."),
        None => "(masa la alegere)".to_string(),
    };

    format!(
        "{BASE_SYSTEM_INSTRUCTION}\n\
Context:\n\
- Ingrediente disponibile (frigider): {inventory}\n\
- Rețete ale utilizatorului (din baza de date):\n  {recipe_lines}\n\
- {meal_line}\n\n\
Cerințe pentru răspuns (Markdown, concis, executabil):\n\
1) Propune 1–3 rețete FEZABILE pe baza inventarului, nu te opri la listă de ingrediente.\n\
2) Pentru fiecare rețetă oferă:\n\
   - Titlu\n\
   - Timp total | Dificultate\n\
   - Ingrediente folosite din frigider\n\
   - Ingrediente lipsă/opționale (cu înlocuiri posibile)\n\
   - Pași 1..N clari (max 6)\n\
3) Dacă vezi potriviri cu rețetele utilizatorului, menționează „Compatibil cu rețeta ta: <nume>”.\n\
4) Încheie întrebând: „Alege o rețetă (1–3) ca să-ți dau cantitățile exacte și pașii detaliați.”\n"
    )
}

/// Creative prompt built only from the user's request; inventory is ignored.
pub fn creative_recipes(query: &str, count: usize) -> String {
    format!(
        "{BASE_SYSTEM_INSTRUCTION}\n\
Cerere utilizator: \"{query}\"\n\n\
Oferă {count} rețete/idei relevante. Pentru fiecare:\n\
- Titlu\n\
- Timp total | Dificultate\n\
- Ingrediente\n\
- Pași 1..N (clari, max 7)\n\
- Variații/înlocuiri dacă e util\n"
    )
}

/// Companion chat for non-culinary topics.
pub fn open_chat(message: &str) -> String {
    format!(
        "{BASE_SYSTEM_INSTRUCTION}\n\
Conversație liberă. Răspunde la mesajul de mai jos ca un companion AI:\n\n\
„{message}”\n\n\
Stil: răspuns scurt-mediu, în română, o întrebare de follow-up când are sens. \
Nu forța subiectul culinar.\n"
    )
}

/// Upload flow: three creative recipes from the detected ingredient list.
pub fn detected_recipes(ingredients: &[String]) -> String {
    format!(
        "Ești ChefGPT, un asistent culinar inteligent.\n\
Având următoarele ingrediente: {},\n\
creează 3 rețete creative care să includă:\n\
- Titlu și descriere\n\
- Lista completă de ingrediente\n\
- Pași de preparare numerotați\n\
- Timp de preparare și calorii\n\
- Sugestii de servire\n\
Răspunde în limba română, frumos formatat în Markdown.\n",
        ingredients.join(", ")
    )
}
