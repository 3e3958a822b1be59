use linked_lists::SList;

fn main() {
    let mut list = SList::<i32>::new();
    println!("{}", list);
    println!("{}", list.is_empty());

    list.append(1);
    list.append(2);
    list.append(3);
    println!("{}", list);
    println!("{}", list.is_empty());

    list.prepend(0);
    println!("{}", list);
    println!("{}", list.search(&1));
    println!("{}", list.search(&4));

    list.reverse();
    println!("{}", list);

    println!("{}", list.delete(&2));
    println!("{:?} (len {})", list.to_vec(), list.len());
}
