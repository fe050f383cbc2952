//! Shared test utilities for docmatch integration tests.
//!
//! Import via `mod common;` in integration test files:
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use docmatch::{Matcher, Value};

// ============================================================================
// Value helpers
// ============================================================================

/// Midnight UTC on the given day.
#[allow(dead_code)]
pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap()
}

/// Names of the matched documents, sorted.
#[allow(dead_code)]
pub fn names(documents: &[&Value]) -> Vec<String> {
    let mut names: Vec<String> = documents
        .iter()
        .filter_map(|doc| doc.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

/// Filter `documents` with `expression` and return the sorted names.
#[allow(dead_code)]
pub fn matching_names(expression: serde_json::Value, documents: &[Value]) -> Vec<String> {
    let matched = Matcher::new(expression).filter(documents).unwrap();
    names(&matched)
}

// ============================================================================
// Fixtures
// ============================================================================

/// Three users with nested profiles; only John and Bob carry `lastLogin`.
#[allow(dead_code)]
pub fn users() -> Vec<Value> {
    vec![
        Value::from(json!({
            "id": 1,
            "name": "John Doe",
            "email": "john@example.com",
            "age": 30,
            "isActive": true,
            "roles": ["admin", "user"],
            "profile": {
                "bio": "Senior developer with 10 years experience",
                "skills": ["JavaScript", "TypeScript", "React", "Node.js"],
                "location": { "city": "New York", "country": "USA" }
            },
            "metadata": {
                "lastLogin": "2025-07-30",
                "preferences": { "theme": "dark", "notifications": true, "language": "en" }
            }
        })),
        Value::from(json!({
            "id": 2,
            "name": "Jane Smith",
            "email": "jane@example.com",
            "age": 25,
            "isActive": false,
            "roles": ["user"],
            "profile": {
                "bio": "Senior manager with 5 years experience",
                "skills": ["Serverless", "TypeScript"],
                "location": { "city": "San Francisco", "country": "USA" }
            },
            "metadata": {
                "preferences": { "theme": "light" }
            }
        })),
        Value::from(json!({
            "id": 3,
            "name": "Bob Johnson",
            "email": "bob@test.com",
            "age": 35,
            "isActive": true,
            "roles": ["user", "moderator"],
            "profile": {
                "bio": "Full-stack engineer",
                "skills": ["Python", "JavaScript", "Docker"],
                "location": { "city": "London", "country": "UK" }
            },
            "metadata": {
                "lastLogin": "2025-07-29",
                "preferences": { "theme": "dark", "timezone": "GMT" }
            }
        })),
    ]
}

/// Two products whose `createdAt` is a real date value.
#[allow(dead_code)]
pub fn products() -> Vec<Value> {
    let mut laptop = Value::from(json!({
        "id": 1,
        "name": "Laptop Pro",
        "price": 1299.99,
        "category": "electronics",
        "tags": ["computer", "portable", "work"],
        "specs": {
            "weight": 1.5,
            "dimensions": { "width": 30, "height": 2, "depth": 20 }
        }
    }));
    let mut mouse = Value::from(json!({
        "id": 2,
        "name": "Gaming Mouse",
        "price": 79.99,
        "category": "accessories",
        "tags": ["gaming", "peripheral", "rgb"],
        "specs": {
            "weight": 0.1,
            "dimensions": { "width": 12, "height": 4, "depth": 7 }
        }
    }));
    set(&mut laptop, "createdAt", Value::Date(date(2025, 1, 1)));
    set(&mut mouse, "createdAt", Value::Date(date(2025, 1, 15)));
    vec![laptop, mouse]
}

/// A company with employees, skills and departments nested several levels deep.
#[allow(dead_code)]
pub fn company() -> Value {
    let mut company = Value::from(json!({
        "id": 1,
        "name": "Tech Corp",
        "employees": [
            {
                "id": 1,
                "name": "Alice Johnson",
                "email": "alice@techcorp.com",
                "salary": 120000,
                "department": "Engineering",
                "skills": [
                    { "name": "JavaScript", "level": "expert", "years": 8 },
                    { "name": "Python", "level": "expert", "years": 9 },
                    { "name": "TypeScript", "level": "advanced", "years": 5 },
                    { "name": "React", "level": "expert", "years": 6 }
                ],
                "address": {
                    "street": "123 Main St",
                    "city": "San Francisco",
                    "state": "CA",
                    "country": "USA",
                    "zipCode": "94105"
                },
                "directReports": []
            },
            {
                "id": 2,
                "name": "Bob Smith",
                "email": "bob@techcorp.com",
                "salary": 95000,
                "department": "Engineering",
                "skills": [
                    { "name": "Python", "level": "advanced", "years": 4 },
                    { "name": "Django", "level": "intermediate", "years": 3 }
                ],
                "address": {
                    "street": "456 Oak Ave",
                    "city": "Seattle",
                    "state": "WA",
                    "country": "USA",
                    "zipCode": "98101"
                },
                "directReports": []
            }
        ],
        "departments": [
            {
                "id": 1,
                "name": "Engineering",
                "budget": 5000000,
                "teams": [
                    {
                        "id": 1,
                        "name": "Frontend Team",
                        "members": [],
                        "projects": [
                            {
                                "id": 1,
                                "name": "New UI Dashboard",
                                "status": "active",
                                "budget": 250000,
                                "tags": ["ui", "dashboard", "react"]
                            }
                        ]
                    }
                ]
            }
        ],
        "headquarters": {
            "street": "789 Corporate Blvd",
            "city": "San Francisco",
            "state": "CA",
            "country": "USA",
            "zipCode": "94105"
        },
        "metadata": {
            "industry": "Technology",
            "revenue": 50000000,
            "public": true,
            "subsidiaries": []
        }
    }));
    set(&mut company, "founded", Value::Date(date(2010, 1, 1)));
    company
}

/// A thousand generated users with a fixed distribution of roles.
///
/// Every tenth user is `["admin"]`, every other fifth `["mod"]`, the remaining
/// even ids `["user"]` and the remaining odd ids `["user", "mod"]`.
#[allow(dead_code)]
pub fn large_dataset() -> Vec<Value> {
    (0..1000)
        .map(|i: u32| {
            let roles = if i % 10 == 0 {
                json!(["admin"])
            } else if i % 5 == 0 {
                json!(["mod"])
            } else if i % 2 == 0 {
                json!(["user"])
            } else {
                json!(["user", "mod"])
            };
            let skills: Vec<&str> = ["JavaScript", "TypeScript"]
                .into_iter()
                .take((i % 2 + 1) as usize)
                .collect();
            let city = ["New York", "San Francisco", "London"][(i % 3) as usize];
            Value::from(json!({
                "id": i,
                "name": format!("User {i}"),
                "email": format!("user{i}@example.com"),
                "age": 20 + i % 50,
                "isActive": i % 2 == 0,
                "roles": roles,
                "profile": {
                    "bio": format!("Bio for user {i}"),
                    "skills": skills,
                    "location": {
                        "city": city,
                        "country": "Test Country"
                    }
                }
            }))
        })
        .collect()
}

fn set(document: &mut Value, key: &str, value: Value) {
    if let Value::Object(map) = document {
        map.insert(key.to_string(), value);
    }
}
