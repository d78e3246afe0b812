//! Demo data written to empty collections on first access.

use chrono::{DateTime, TimeZone, Utc};

use super::{Post, PostStatus, Product, Variant};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn demo_products() -> Vec<Product> {
    let created = epoch();
    vec![
        Product {
            id: "prod_demo_bowl".into(),
            name: "Stainless Raw Feeding Bowl".into(),
            description: "Dishwasher-safe bowl sized for a full raw meal.".into(),
            categories: vec!["accessories".into()],
            images: vec!["/images/products/bowl.jpg".into()],
            price_cents: 1899,
            currency: "USD".into(),
            active: true,
            variants: vec![
                Variant {
                    id: "prod_demo_bowl_s".into(),
                    name: "Small".into(),
                    price_cents: 1899,
                    inventory: 40,
                    gelato_variant_id: None,
                    gelato_product_uid: None,
                },
                Variant {
                    id: "prod_demo_bowl_l".into(),
                    name: "Large".into(),
                    price_cents: 2499,
                    inventory: 25,
                    gelato_variant_id: None,
                    gelato_product_uid: None,
                },
            ],
            gelato_product_id: None,
            sync_status: None,
            created_at: created,
            updated_at: created,
        },
        Product {
            id: "prod_demo_scale".into(),
            name: "Portion Scale".into(),
            description: "Gram-accurate kitchen scale for weighing meat, bone, and organ ratios.".into(),
            categories: vec!["accessories".into(), "prep".into()],
            images: vec!["/images/products/scale.jpg".into()],
            price_cents: 2999,
            currency: "USD".into(),
            active: true,
            variants: Vec::new(),
            gelato_product_id: None,
            sync_status: None,
            created_at: created,
            updated_at: created,
        },
        Product {
            id: "prod_demo_guide".into(),
            name: "Raw Feeding Starter Guide".into(),
            description: "Printed guide covering the 80/10/10 model and transition plans.".into(),
            categories: vec!["books".into()],
            images: vec!["/images/products/guide.jpg".into()],
            price_cents: 1499,
            currency: "USD".into(),
            active: true,
            variants: Vec::new(),
            gelato_product_id: None,
            sync_status: None,
            created_at: created,
            updated_at: created,
        },
    ]
}

pub fn welcome_posts() -> Vec<Post> {
    let created = epoch();
    vec![Post {
        id: "post_welcome".into(),
        title: "Welcome to Raw Feeding".into(),
        slug: "welcome-to-raw-feeding".into(),
        excerpt: "What raw feeding is and how to start safely.".into(),
        content: "Raw feeding replaces processed food with muscle meat, bone, and organ. \
                  Start with a single protein, weigh every portion, and transition over two weeks."
            .into(),
        author_id: "system".into(),
        status: PostStatus::Published,
        tags: vec!["getting-started".into()],
        created_at: created,
        updated_at: created,
        published_at: Some(created),
    }]
}
