//! Deterministic fixture data for the in-memory marketplace.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use super::types::{
    Category, Coupon, DiscountType, Order, OrderStatus, PaymentMethod, PlatformSettings,
    Restaurant, RestaurantStatus, User, UserRole, UserStatus,
};

/// Seed of the fixture generator. Same seed, same data.
pub const SEED: u64 = 0x50_55_51;

const ORDER_COUNT: usize = 120;

const FIRST_NAMES: [&str; 12] = [
    "Ahmed", "Mohammed", "Sara", "Fatima", "Omar", "Layla", "Khalid", "Noura", "Yousef", "Huda",
    "Ali", "Mariam",
];

const LAST_NAMES: [&str; 4] = ["Al-Harbi", "Al-Qahtani", "Al-Otaibi", "Al-Zahrani"];

const CATEGORIES: [(&str, &str, &str); 8] = [
    ("Pizza", "بيتزا", "Stone-baked and pan pizzas"),
    ("Burgers", "برجر", "Beef, chicken and veggie burgers"),
    ("Shawarma", "شاورما", "Wraps and plates"),
    ("Sushi", "سوشي", "Rolls, nigiri and bowls"),
    ("Desserts", "حلويات", "Cakes, kunafa and ice cream"),
    ("Coffee", "قهوة", "Specialty coffee and tea"),
    ("Grills", "مشويات", "Kebab, mandi and mixed grills"),
    ("Healthy", "صحي", "Salads and calorie-counted meals"),
];

const RESTAURANTS: [(&str, &str, usize); 12] = [
    ("Pizza Roma", "بيتزا روما", 0),
    ("Napoli Oven", "فرن نابولي", 0),
    ("Burger Hub", "برجر هب", 1),
    ("Smash Point", "سماش بوينت", 1),
    ("Al Sham", "الشام", 2),
    ("Shawarma House", "بيت الشاورما", 2),
    ("Sushi Ya", "سوشي يا", 3),
    ("Sweet Corner", "الركن الحلو", 4),
    ("Kunafa Palace", "قصر الكنافة", 4),
    ("Coffee Lab", "مختبر القهوة", 5),
    ("Bait Al Mandi", "بيت المندي", 6),
    ("Green Bowl", "الوعاء الأخضر", 7),
];

const CITIES: [&str; 2] = ["Riyadh", "Jeddah"];

const COUPON_CODES: [&str; 12] = [
    "WELCOME10", "SOUQ20", "RAMADAN25", "FREESHIP", "WEEKEND15", "LUNCH5", "FAMILY30",
    "COFFEE3", "SWEET10", "NIGHT12", "FIRSTORDER", "VIP50",
];

/// English and Arabic names of the fixture cuisine categories.
pub fn category_names() -> impl Iterator<Item = (&'static str, &'static str)> {
    CATEGORIES.iter().map(|(name, name_ar, _)| (*name, *name_ar))
}

/// Every collection of the fixture marketplace.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub users: Vec<User>,
    pub restaurants: Vec<Restaurant>,
    pub orders: Vec<Order>,
    pub categories: Vec<Category>,
    pub coupons: Vec<Coupon>,
    pub settings: PlatformSettings,
}

/// Generate fixtures with timestamps relative to `now`.
pub fn generate(now: DateTime<Utc>) -> Fixtures {
    let mut rng = StdRng::seed_from_u64(SEED);

    let categories = categories(&mut rng);
    let mut restaurants = restaurants(&mut rng, now);
    let mut users = users(&mut rng, now);
    let orders = orders(&mut rng, now, &mut users, &mut restaurants);
    let coupons = coupons(&mut rng, now);

    Fixtures {
        users,
        restaurants,
        orders,
        categories,
        coupons,
        settings: PlatformSettings::default(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn categories(rng: &mut StdRng) -> Vec<Category> {
    CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, (name, name_ar, description))| Category {
            id: format!("c{}", i + 1),
            name: name.to_string(),
            name_ar: name_ar.to_string(),
            description: description.to_string(),
            restaurants_count: RESTAURANTS.iter().filter(|r| r.2 == i).count() as u32
                * CITIES.len() as u32,
            is_active: rng.random_bool(0.85),
            sort_order: i as u32 + 1,
        })
        .collect()
}

fn restaurants(rng: &mut StdRng, now: DateTime<Utc>) -> Vec<Restaurant> {
    let mut out = Vec::new();
    for city in CITIES {
        for (name, name_ar, category) in RESTAURANTS {
            let status = match rng.random_range(0..10) {
                0 => RestaurantStatus::Pending,
                1 => RestaurantStatus::Closed,
                2 if out.len() % 3 == 0 => RestaurantStatus::Suspended,
                _ => RestaurantStatus::Open,
            };
            out.push(Restaurant {
                id: String::new(),
                name: format!("{} {}", name, city),
                name_ar: name_ar.to_string(),
                owner_name: format!(
                    "{} {}",
                    FIRST_NAMES.choose(rng).copied().unwrap_or("Ahmed"),
                    LAST_NAMES.choose(rng).copied().unwrap_or("Al-Harbi")
                ),
                category: CATEGORIES[category].0.to_string(),
                city: city.to_string(),
                rating: round2(rng.random_range(3.0..5.0)),
                status,
                is_featured: rng.random_bool(0.25),
                orders_count: 0,
                created_at: now - Duration::days(rng.random_range(30..720)),
            });
        }
    }
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let total = out.len();
    for (i, r) in out.iter_mut().enumerate() {
        r.id = format!("r{}", total - i);
    }
    out
}

fn users(rng: &mut StdRng, now: DateTime<Utc>) -> Vec<User> {
    let mut out = Vec::new();
    for last in LAST_NAMES {
        for first in FIRST_NAMES {
            let role = match rng.random_range(0..20) {
                0 => UserRole::Admin,
                1..=2 => UserRole::Driver,
                3..=4 => UserRole::RestaurantOwner,
                _ => UserRole::Customer,
            };
            let status = match rng.random_range(0..10) {
                0 => UserStatus::Suspended,
                1 => UserStatus::Inactive,
                _ => UserStatus::Active,
            };
            let email = format!(
                "{}.{}@example.com",
                first.to_lowercase(),
                last.trim_start_matches("Al-").to_lowercase()
            );
            out.push(User {
                id: String::new(),
                name: format!("{} {}", first, last),
                email,
                phone: format!("+9665{:08}", rng.random_range(0..100_000_000u32)),
                role,
                status,
                orders_count: 0,
                total_spent: 0.0,
                created_at: now - Duration::days(rng.random_range(0..400)),
            });
        }
    }
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let total = out.len();
    for (i, u) in out.iter_mut().enumerate() {
        u.id = format!("u{}", total - i);
    }
    out
}

fn orders(
    rng: &mut StdRng,
    now: DateTime<Utc>,
    users: &mut [User],
    restaurants: &mut [Restaurant],
) -> Vec<Order> {
    let mut out: Vec<Order> = Vec::with_capacity(ORDER_COUNT);
    for _ in 0..ORDER_COUNT {
        let customer = rng.random_range(0..users.len());
        let restaurant = rng.random_range(0..restaurants.len());
        let status = match rng.random_range(0..20) {
            0..=1 => OrderStatus::Cancelled,
            2..=3 => OrderStatus::Pending,
            4 => OrderStatus::Confirmed,
            5 => OrderStatus::Preparing,
            6 => OrderStatus::OnTheWay,
            _ => OrderStatus::Delivered,
        };
        let total = round2(rng.random_range(20.0..300.0));
        let minutes_ago = rng.random_range(5..(180 * 24 * 60));

        users[customer].orders_count += 1;
        if status.is_billable() {
            users[customer].total_spent = round2(users[customer].total_spent + total);
        }
        restaurants[restaurant].orders_count += 1;

        out.push(Order {
            id: String::new(),
            order_number: String::new(),
            customer_name: users[customer].name.clone(),
            restaurant_name: restaurants[restaurant].name.clone(),
            items_count: rng.random_range(1..=6),
            total,
            status,
            payment_method: *PaymentMethod::ALL.choose(rng).unwrap_or(&PaymentMethod::Cash),
            created_at: now - Duration::minutes(minutes_ago),
        });
    }
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let total = out.len();
    for (i, o) in out.iter_mut().enumerate() {
        let n = total - i;
        o.id = format!("o{}", n);
        o.order_number = format!("ORD-{}", 1000 + n);
    }
    out
}

fn coupons(rng: &mut StdRng, now: DateTime<Utc>) -> Vec<Coupon> {
    COUPON_CODES
        .iter()
        .enumerate()
        .map(|(i, code)| {
            let discount_type = if rng.random_bool(0.6) {
                DiscountType::Percentage
            } else {
                DiscountType::Fixed
            };
            let discount_value = match discount_type {
                DiscountType::Percentage => f64::from(rng.random_range(1..=10u32) * 5),
                DiscountType::Fixed => f64::from(rng.random_range(1..=10u32) * 3),
            };
            let usage_limit = rng.random_range(1..=20u32) * 50;
            Coupon {
                id: format!("cp{}", COUPON_CODES.len() - i),
                code: code.to_string(),
                discount_type,
                discount_value,
                min_order: f64::from(rng.random_range(0..=10u32) * 10),
                usage_limit,
                used_count: rng.random_range(0..=usage_limit),
                expires_at: now + Duration::days(rng.random_range(-60..180)),
                is_active: rng.random_bool(0.75),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::repository::Record;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate(fixed_now());
        let b = generate(fixed_now());
        assert_eq!(a.users, b.users);
        assert_eq!(a.orders, b.orders);
        assert_eq!(a.coupons, b.coupons);
    }

    #[test]
    fn test_collection_sizes() {
        let f = generate(fixed_now());
        assert_eq!(f.users.len(), 48);
        assert_eq!(f.restaurants.len(), 24);
        assert_eq!(f.orders.len(), ORDER_COUNT);
        assert_eq!(f.categories.len(), 8);
        assert_eq!(f.coupons.len(), 12);
    }

    #[test]
    fn test_ids_are_unique_and_prefixed() {
        let f = generate(fixed_now());
        let ids: HashSet<_> = f.users.iter().map(|u| u.id.clone()).collect();
        assert_eq!(ids.len(), f.users.len());
        assert!(f.users.iter().all(|u| u.id.starts_with(User::ID_PREFIX)));
        assert!(f.coupons.iter().all(|c| c.id.starts_with(Coupon::ID_PREFIX)));
    }

    #[test]
    fn test_newest_first() {
        let f = generate(fixed_now());
        assert!(f
            .orders
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(f.orders[0].order_number, format!("ORD-{}", 1000 + ORDER_COUNT));
    }

    #[test]
    fn test_fixtures_pass_validation() {
        let f = generate(fixed_now());
        assert!(f.users.iter().all(|u| u.validate().is_ok()));
        assert!(f.restaurants.iter().all(|r| r.validate().is_ok()));
        assert!(f.orders.iter().all(|o| o.validate().is_ok()));
        assert!(f.coupons.iter().all(|c| c.validate().is_ok()));
    }

    #[test]
    fn test_order_counts_are_consistent() {
        let f = generate(fixed_now());
        let from_users: u32 = f.users.iter().map(|u| u.orders_count).sum();
        let from_restaurants: u32 = f.restaurants.iter().map(|r| r.orders_count).sum();
        assert_eq!(from_users as usize, ORDER_COUNT);
        assert_eq!(from_restaurants as usize, ORDER_COUNT);
    }
}
