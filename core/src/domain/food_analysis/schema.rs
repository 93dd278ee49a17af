use serde_json::{Value, json};

/// Structured-output schema sent with the model request.
pub fn get_recipe_analysis_schema() -> Value {
    let string_list = json!({ "type": "array", "items": { "type": "string" } });

    json!({
        "type": "object",
        "properties": {
            "detected_ingredients": string_list,
            "recipes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "description": { "type": "string" },
                        "servings": { "type": "integer" },
                        "ingredients_used": string_list,
                        "additional_ingredients": string_list,
                        "instructions": string_list,
                        "nutrition": {
                            "type": "object",
                            "properties": {
                                "calories_kcal": { "type": "number" },
                                "protein_g": { "type": "number" },
                                "carbs_g": { "type": "number" },
                                "fat_g": { "type": "number" }
                            },
                            "required": ["calories_kcal", "protein_g", "carbs_g", "fat_g"]
                        },
                        "health_score": { "type": "integer" },
                        "health_explanation": { "type": "string" },
                        "diet_tags": string_list,
                        "estimated_time_minutes": { "type": "integer" },
                        "youtube_query": { "type": "string" }
                    },
                    "required": [
                        "name",
                        "description",
                        "ingredients_used",
                        "instructions",
                        "nutrition",
                        "health_score",
                        "youtube_query"
                    ]
                }
            },
            "ranking": string_list
        },
        "required": ["detected_ingredients", "recipes", "ranking"]
    })
}

/// Example of the expected answer, embedded verbatim in the prompt.
pub fn recipe_response_template() -> Value {
    json!({
        "detected_ingredients": ["ingredient visible in the image"],
        "recipes": [
            {
                "name": "string",
                "description": "string",
                "servings": "integer",
                "ingredients_used": ["ingredient from the image with quantity, e.g. 2 eggs"],
                "additional_ingredients": ["ingredient not in the image with quantity"],
                "instructions": ["step"],
                "nutrition": {
                    "calories_kcal": "number",
                    "protein_g": "number",
                    "carbs_g": "number",
                    "fat_g": "number"
                },
                "health_score": "integer from 1 to 10",
                "health_explanation": "string",
                "diet_tags": ["tag"],
                "estimated_time_minutes": "integer",
                "youtube_query": "short search query for a video tutorial of this recipe"
            }
        ],
        "ranking": ["recipe name, best fit first"]
    })
}
