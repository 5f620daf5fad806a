//! Fixture corpora

use archlens::MemoryProvider;

/// A small shop domain touching every relationship category
pub const SHOP: &[(&str, &str)] = &[
    (
        "shop/model/Priced.java",
        r#"package shop.model;

public interface Priced {
    double price();
}
"#,
    ),
    (
        "shop/model/Item.java",
        r#"package shop.model;

public abstract class Item implements Priced {
    protected String label;

    public abstract double price();
}
"#,
    ),
    (
        "shop/model/LineItem.java",
        r#"package shop.model;

public class LineItem extends Item {
    private int quantity;
    private double unit;

    public double price() {
        if (quantity <= 0) {
            return 0;
        }
        return quantity * unit;
    }
}
"#,
    ),
    (
        "shop/model/Customer.java",
        r#"package shop.model;

public class Customer {
    private String name;
}
"#,
    ),
    (
        "shop/model/Order.java",
        r#"package shop.model;

import java.util.List;
import java.util.ArrayList;

/* An order groups line items for one customer */
public class Order implements Priced {
    private List<LineItem> items = new ArrayList<>();
    private Customer customer;

    public Order(Customer customer) {
        this.customer = customer;
    }

    public double price() {
        double total = 0;
        for (LineItem item : items) {
            total += item.price();
        }
        return total;
    }
}
"#,
    ),
    (
        "shop/util/Logger.java",
        r#"package shop.util;

public class Logger {
    private static Logger instance = null;

    public static Logger get() {
        if (instance == null) {
            instance = new Logger();
        }
        return instance;
    }

    public void log(String message) {
        // "if (quiet)" never counts
        System.out.println("log: if (x) while (y)");
    }
}
"#,
    ),
    (
        "App.java",
        r#"public class App {
    public static void main(String[] args) {
        Customer c = new Customer();
        Order order = new Order(c);
        Logger.get().log("total " + order.price());
    }
}
"#,
    ),
];

pub fn shop_provider() -> MemoryProvider {
    MemoryProvider::from_pairs("shop", SHOP.iter().copied())
}
