//! Hand-maintained OpenAPI document for the HTTP surface.
//!
//! Served at `/api-docs`. Kept in sync with the handlers by the tests in
//! `tests/http.rs`; there is no generation step.

use axum::Json;
use serde_json::{json, Value};

/// `GET /api-docs` — the OpenAPI 3.0 contract as JSON.
pub async fn openapi() -> Json<Value> {
    Json(json!({
        "openapi": "3.0.0",
        "info": {
            "title": "docstore API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "User records over a JSON-file-backed document store",
        },
        "paths": {
            "/api/users": {
                "post": {
                    "tags": ["Users"],
                    "summary": "Create a new user",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateUserInput" }
                            }
                        }
                    },
                    "responses": {
                        "201": {
                            "description": "User created successfully",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateUserResponse" }
                                }
                            }
                        },
                        "400": {
                            "description": "Missing or invalid fields",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "CreateUserInput": {
                    "type": "object",
                    "required": ["name", "email", "password"],
                    "properties": {
                        "name": { "type": "string" },
                        "email": { "type": "string", "format": "email" },
                        "password": { "type": "string", "format": "password", "minLength": 8 }
                    }
                },
                "CreateUserResponse": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "format": "uuid" },
                        "name": { "type": "string" },
                        "email": { "type": "string" }
                    }
                },
                "ErrorResponse": {
                    "type": "object",
                    "properties": {
                        "errors": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["message"],
                                "properties": {
                                    "message": { "type": "string" },
                                    "field": { "type": "string" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }))
}
