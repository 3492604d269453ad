//! Wire payload to domain type conversion functions.

use freshcart_core::{
    CartId, CartItemId, CategoryId, OrderId, PaymentMethod, Price, ProductId, UserId,
};

use crate::api::types::{
    AuthGrant, AuthToken, AuthUser, Brand, Cart, CartItem, CartProduct, CartProductSummary,
    Category, Order, OrderAddress, Pagination, Product, ProductPage,
};

use super::wire::{
    AuthResponse, BrandDto, CartItemDto, CartItemProductDto, CartResponse, CategoryDto,
    OrderDto, ProductDto, ProductListResponse,
};

// =============================================================================
// Catalog
// =============================================================================

pub fn convert_product(dto: ProductDto) -> Product {
    Product {
        id: ProductId::new(dto.id),
        title: dto.title,
        description: dto.description,
        price: Price::catalog(dto.price),
        price_after_discount: dto.price_after_discount.map(Price::catalog),
        image_cover: dto.image_cover,
        images: dto.images,
        ratings_average: dto.ratings_average,
        ratings_quantity: dto.ratings_quantity,
        category: dto.category.map(convert_category),
        brand: dto.brand.map(convert_brand),
    }
}

/// Convert a listing, defaulting missing metadata to a single page.
pub fn convert_product_page(dto: ProductListResponse, requested_page: u32) -> ProductPage {
    let current_page = dto
        .metadata
        .as_ref()
        .and_then(|m| m.current_page)
        .unwrap_or(requested_page)
        .max(1);
    let number_of_pages = dto
        .metadata
        .as_ref()
        .and_then(|m| m.number_of_pages)
        .unwrap_or(current_page)
        .max(1);

    ProductPage {
        products: dto.data.into_iter().map(convert_product).collect(),
        pagination: Pagination {
            current_page,
            number_of_pages,
        },
    }
}

fn convert_category(dto: CategoryDto) -> Category {
    Category {
        id: CategoryId::new(dto.id),
        name: dto.name,
        slug: dto.slug,
        image: dto.image,
    }
}

fn convert_brand(dto: BrandDto) -> Brand {
    Brand {
        name: dto.name,
        image: dto.image,
    }
}

// =============================================================================
// Auth
// =============================================================================

pub fn convert_auth(dto: AuthResponse) -> AuthGrant {
    AuthGrant {
        token: AuthToken::new(dto.token),
        user: AuthUser {
            name: dto.user.name,
            email: dto.user.email,
            role: dto.user.role,
        },
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Convert a cart response.
///
/// The item count is the server's `numOfCartItems`; when absent, the number
/// of lines.
pub fn convert_cart(dto: CartResponse) -> Cart {
    let items: Vec<CartItem> = dto.data.products.into_iter().map(convert_cart_item).collect();
    let item_count = dto
        .num_of_cart_items
        .unwrap_or_else(|| u32::try_from(items.len()).unwrap_or(u32::MAX));

    Cart {
        id: CartId::new(dto.data.id),
        owner: UserId::new(dto.data.cart_owner),
        total_price: Price::catalog(dto.data.total_cart_price),
        item_count,
        items,
    }
}

fn convert_cart_item(dto: CartItemDto) -> CartItem {
    let product = match dto.product {
        CartItemProductDto::Populated(p) => CartProduct::Populated(CartProductSummary {
            id: ProductId::new(p.id),
            title: p.title,
            image_cover: p.image_cover,
            category_name: p.category.map(|c| c.name),
        }),
        CartItemProductDto::Reference(id) => CartProduct::Reference(ProductId::new(id)),
    };

    CartItem {
        id: CartItemId::new(dto.id),
        product,
        quantity: dto.count,
        price: Price::catalog(dto.price),
    }
}

// =============================================================================
// Orders
// =============================================================================

pub fn convert_order(dto: OrderDto) -> Order {
    Order {
        id: OrderId::new(dto.id),
        items: dto.cart_items.into_iter().map(convert_cart_item).collect(),
        total_price: Price::catalog(dto.total_order_price),
        payment_method: dto.payment_method_type.unwrap_or(PaymentMethod::Cash),
        is_paid: dto.is_paid,
        is_delivered: dto.is_delivered,
        shipping_address: dto.shipping_address.map(|a| OrderAddress {
            details: a.details,
            phone: a.phone,
            city: a.city,
        }),
        created_at: dto.created_at,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cart_with_populated_products() {
        let dto: CartResponse = serde_json::from_str(
            r#"{
                "status": "success",
                "numOfCartItems": 2,
                "cartId": "c1",
                "data": {
                    "_id": "c1",
                    "cartOwner": "u1",
                    "products": [
                        {"count": 2, "_id": "l1", "price": 149,
                         "product": {"_id": "p1", "title": "Woman Shawl", "imageCover": "a.jpg",
                                     "category": {"_id": "cat", "name": "Women's Fashion", "slug": "womens-fashion"}}},
                        {"count": 1, "_id": "l2", "price": 20, "product": "p2"}
                    ],
                    "totalCartPrice": 318
                }
            }"#,
        )
        .unwrap();

        let cart = convert_cart(dto);
        assert_eq!(cart.id.as_str(), "c1");
        assert_eq!(cart.owner.as_str(), "u1");
        assert_eq!(cart.item_count, 2);
        assert_eq!(cart.total_price.to_string(), "318 EGP");
        assert_eq!(
            cart.items[0].product.summary().unwrap().category_name.as_deref(),
            Some("Women's Fashion")
        );
        assert_eq!(
            cart.items[1].product,
            CartProduct::Reference(ProductId::new("p2"))
        );
    }

    #[test]
    fn test_convert_cart_count_falls_back_to_lines() {
        let dto: CartResponse = serde_json::from_str(
            r#"{"data": {"_id": "c1", "cartOwner": "u1",
                "products": [{"count": 5, "_id": "l1", "price": 1, "product": "p1"}],
                "totalCartPrice": 5}}"#,
        )
        .unwrap();
        assert_eq!(convert_cart(dto).item_count, 1);
    }

    #[test]
    fn test_convert_product_page_defaults_metadata() {
        let dto: ProductListResponse = serde_json::from_str(
            r#"{"data": [{"_id": "p1", "id": "p1", "title": "Woman Shawl", "price": 149,
                "ratingsAverage": 4.8, "ratingsQuantity": 18}]}"#,
        )
        .unwrap();
        let page = convert_product_page(dto, 3);
        assert_eq!(page.pagination.current_page, 3);
        assert_eq!(page.pagination.number_of_pages, 3);
        assert_eq!(page.products[0].price.to_string(), "149 EGP");
        assert!((page.products[0].ratings_average - 4.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_convert_order() {
        let dto: OrderDto = serde_json::from_str(
            r#"{"_id": "o1", "totalOrderPrice": 318, "paymentMethodType": "cash",
                "isPaid": false, "isDelivered": false,
                "shippingAddress": {"details": "12 Nile St", "phone": "01012345678", "city": "Cairo"},
                "createdAt": "2024-03-01T10:00:00.000Z",
                "cartItems": []}"#,
        )
        .unwrap();
        let order = convert_order(dto);
        assert_eq!(order.id.as_str(), "o1");
        assert_eq!(order.payment_method, PaymentMethod::Cash);
        assert_eq!(order.status(), freshcart_core::OrderStatus::Pending);
        assert!(order.created_at.is_some());
        assert_eq!(
            order.shipping_address.unwrap().city.as_deref(),
            Some("Cairo")
        );
    }
}
