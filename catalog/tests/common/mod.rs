//! Collection fixtures shared by the integration tests.

use std::{fs, path::Path};

use serde_json::json;

/// Write the four catalog collections into `dir`.
pub fn write_fixtures(dir: &Path) {
    let files = [
        (
            "subjects.json",
            json!([
                {
                    "id": 1,
                    "type": "programming",
                    "label": "программирование",
                    "icon": "/icons/code.svg",
                    "color": "#1e88e5",
                    "additional_description": ["Много практики."]
                },
                {
                    "id": 2,
                    "type": "ai",
                    "label": "искусственный интеллект",
                    "icon": "/icons/ai.svg",
                    "color": "#7c4dff",
                    "additional_description": []
                }
            ]),
        ),
        (
            "difficulties.json",
            json!([
                {"type": "beginner", "label": "начальный", "icon": "", "color": "#43a047"},
                {"type": "advanced", "label": "продвинутый", "icon": "", "color": "#e53935"}
            ]),
        ),
        (
            "grades.json",
            json!([{"id": 1, "grade": 8}, {"id": 2, "grade": 9}, {"id": 3, "grade": 10}]),
        ),
        (
            "courses.json",
            json!([
                {
                    "id": "py-8",
                    "title": "Python с нуля",
                    "description": "Основы языка",
                    "subjects": ["programming"],
                    "grades": [8, 9],
                    "start_date": "2024-09-01",
                    "end_date": "2024-12-20",
                    "url": "https://example.org/python",
                    "organization": "Школа программистов",
                    "difficulty": "beginner"
                },
                {
                    "id": "ml-10",
                    "title": "Машинное обучение",
                    "description": "Нейросети и данные",
                    "subjects": ["ai", "programming"],
                    "grades": [10],
                    "start_date": "2024-10-01",
                    "end_date": "2025-05-31",
                    "url": "https://example.org/ml",
                    "organization": "Лаборатория ИИ",
                    "difficulty": "advanced"
                }
            ]),
        ),
    ];
    for (name, value) in files {
        fs::write(dir.join(name), serde_json::to_vec_pretty(&value).unwrap()).unwrap();
    }
}
