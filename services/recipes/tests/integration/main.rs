mod edge_test;
mod recipe_test;
mod router_test;
mod shopping_list_test;
