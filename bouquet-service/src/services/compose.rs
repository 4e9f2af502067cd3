//! Text templates for the bouquet description and the image prompt.

use crate::models::BouquetSpec;

/// Placeholder shown in the description for fields the customer left blank.
const DESCRIPTION_PLACEHOLDER: &str = "—";

const PROMPT_DEFAULT_OCCASION: &str = "gift";
const PROMPT_DEFAULT_PALETTE: &str = "powder pink and sage";
const PROMPT_DEFAULT_SIZE: &str = "medium";

/// Customer-facing description returned as `text`.
pub fn describe(spec: &BouquetSpec) -> String {
    let or_dash = |field: &Option<String>| {
        field
            .as_deref()
            .unwrap_or(DESCRIPTION_PLACEHOLDER)
            .to_string()
    };

    format!(
        "Bouquet {style}.\n\
         Occasione: {occasion}\n\
         Palette: {palette}\n\
         Dimensione: {size}\n\
         Budget: {budget}€.\n\
         \n\
         Una composizione armoniosa, elegante e pensata per emozionare.",
        style = spec.style_lowercase(),
        occasion = or_dash(&spec.occasion),
        palette = or_dash(&spec.palette),
        size = or_dash(&spec.size),
        budget = spec.budget,
    )
}

/// Prompt sent to the image provider.
pub fn image_prompt(spec: &BouquetSpec) -> String {
    format!(
        "Ultra realistic professional florist photograph of a {style} bouquet.\n\
         Occasion: {occasion}.\n\
         Color palette: {palette}.\n\
         Bouquet size: {size}.\n\
         Visual richness consistent with a {budget} EUR bouquet.\n\
         Natural seasonal flowers, premium wrap, soft daylight, neutral background.\n\
         Luxury floral photography, shallow depth of field, ultra realistic.",
        style = spec.style_lowercase(),
        occasion = spec.occasion.as_deref().unwrap_or(PROMPT_DEFAULT_OCCASION),
        palette = spec.palette.as_deref().unwrap_or(PROMPT_DEFAULT_PALETTE),
        size = spec.size.as_deref().unwrap_or(PROMPT_DEFAULT_SIZE),
        budget = spec.budget,
    )
}
