use crate::domain::lesson::{
    Dialogue, DialogueLine, Lesson, LessonContent, LessonRepository, Level, QuizQuestion, Speaker,
    Word,
};
use std::collections::HashSet;
use std::sync::LazyLock;

const FELIX_AVATAR: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=Felix";
const ANEKA_AVATAR: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=Aneka";

struct RawWord {
    hanzi: &'static str,
    pinyin: &'static str,
    meaning: &'static str,
    example_sentence: &'static str,
    example_meaning: &'static str,
}

const fn w(
    hanzi: &'static str,
    pinyin: &'static str,
    meaning: &'static str,
    example_sentence: &'static str,
    example_meaning: &'static str,
) -> RawWord {
    RawWord {
        hanzi,
        pinyin,
        meaning,
        example_sentence,
        example_meaning,
    }
}

const GREETINGS_ESSENTIALS: &[RawWord] = &[
    w("你好", "Nǐ hǎo", "Hello", "你好，很高兴见到你。", "Hello, nice to meet you."),
    w("谢谢", "Xièxie", "Thank you", "谢谢你的帮助。", "Thank you for your help."),
    w("再见", "Zàijiàn", "Goodbye", "我们明天再见。", "See you tomorrow."),
    w("对不起", "Duìbuqǐ", "Sorry", "对不起，我迟到了。", "Sorry, I am late."),
    w("没关系", "Méiguānxi", "It doesn't matter", "没关系，别担心。", "It's okay, don't worry."),
    w("是", "Shì", "To be (is/am/are)", "我是学生。", "I am a student."),
    w("不是", "Bú shì", "Is not", "他不是老师。", "He is not a teacher."),
    w("好", "Hǎo", "Good", "这个主意很好。", "This is a good idea."),
    w("不好", "Bù hǎo", "Not good", "天气不好。", "The weather is not good."),
    w("请", "Qǐng", "Please", "请坐。", "Please sit down."),
    w("早安", "Zǎo'ān", "Good morning", "大家早安！", "Good morning everyone!"),
    w("晚安", "Wǎn'ān", "Good night", "我要睡觉了，晚安。", "I'm going to sleep, good night."),
    w("名字", "Míngzi", "Name", "你叫什么名字？", "What is your name?"),
    w("高兴", "Gāoxìng", "Happy", "认识你很高兴。", "Nice to meet you."),
    w("不客气", "Bú kèqi", "You're welcome", "不客气，这是我应该做的。", "You're welcome, it's my duty."),
    w("帮忙", "Bāngmáng", "To help", "你能帮忙吗？", "Can you help?"),
    w("借", "Jiè", "Borrow/Lend", "我想借一支笔。", "I want to borrow a pen."),
    w("给", "Gěi", "Give", "请给我那个。", "Please give me that."),
    w("知道", "Zhīdào", "Know", "我不知道。", "I don't know."),
    w("明白", "Míngbái", "Understand", "我明白了。", "I understand."),
];

const NUMBERS_TIME: &[RawWord] = &[
    w("一", "Yī", "One", "我要一个苹果。", "I want one apple."),
    w("二", "Èr", "Two", "我有二个姐姐。", "I have two older sisters."),
    w("三", "Sān", "Three", "现在是三点。", "It is three o'clock."),
    w("四", "Sì", "Four", "我有四本书。", "I have four books."),
    w("五", "Wǔ", "Five", "五个人。", "Five people."),
    w("六", "Liù", "Six", "今天是六号。", "Today is the 6th."),
    w("七", "Qī", "Seven", "七天是一个星期。", "Seven days make a week."),
    w("八", "Bā", "Eight", "八点钟见。", "See you at 8 o'clock."),
    w("九", "Jiǔ", "Nine", "九个杯子。", "Nine cups."),
    w("十", "Shí", "Ten", "他十岁了。", "He is ten years old."),
    w("零", "Líng", "Zero", "二零二四年。", "Year 2024."),
    w("百", "Bǎi", "Hundred", "这本书一百块。", "This book is 100 yuan."),
    w("千", "Qiān", "Thousand", "这个手机一千块。", "This phone is 1000 yuan."),
    w("现在", "Xiànzài", "Now", "现在几点了？", "What time is it now?"),
    w("今天", "Jīntiān", "Today", "今天天气很好。", "The weather is good today."),
    w("明天", "Míngtiān", "Tomorrow", "明天见。", "See you tomorrow."),
    w("昨天", "Zuótiān", "Yesterday", "昨天我去了公园。", "Yesterday I went to the park."),
    w("早上", "Zǎoshang", "Morning", "早上好！", "Good morning!"),
    w("晚上", "Wǎnshang", "Evening", "晚上我要看电影。", "I will watch a movie in the evening."),
    w("下午", "Xiàwǔ", "Afternoon", "下午我有课。", "I have class in the afternoon."),
    w("点", "Diǎn", "O'clock", "我们在五点见面。", "We meet at 5 o'clock."),
    w("分钟", "Fēnzhōng", "Minute", "等我五分钟。", "Wait for me for 5 minutes."),
    w("星期", "Xīngqī", "Week", "今天是星期一。", "Today is Monday."),
    w("周末", "Zhōumò", "Weekend", "周末你做什么？", "What do you do on the weekend?"),
    w("月", "Yuè", "Month", "我的生日在八月。", "My birthday is in August."),
    w("年", "Nián", "Year", "新年快乐！", "Happy New Year!"),
];

const BODY_HEALTH: &[RawWord] = &[
    w("头", "Tóu", "Head", "我的头很疼。", "My head hurts."),
    w("手", "Shǒu", "Hand", "请洗手。", "Please wash your hands."),
    w("脚", "Jiǎo", "Foot/Leg", "我的脚受伤了。", "My foot is injured."),
    w("眼睛", "Yǎnjing", "Eye", "她的眼睛很大。", "Her eyes are big."),
    w("嘴巴", "Zuǐba", "Mouth", "张开嘴巴。", "Open your mouth."),
    w("耳朵", "Ěrduo", "Ear", "我有两个耳朵。", "I have two ears."),
    w("头发", "Tóufa", "Hair", "你的头发很长。", "Your hair is long."),
    w("肚子", "Dùzi", "Stomach", "我肚子饿了。", "I am hungry."),
    w("生病", "Shēngbìng", "Sick", "他生病了。", "He is sick."),
    w("休息", "Xiūxi", "Rest", "你需要休息。", "You need to rest."),
    w("健康", "Jiànkāng", "Health/Healthy", "祝你身体健康。", "Wish you good health."),
    w("看病", "Kànbìng", "See a doctor", "我要去看病。", "I need to see a doctor."),
];

const ANIMALS: &[RawWord] = &[
    w("狗", "Gǒu", "Dog", "我有一只狗。", "I have a dog."),
    w("猫", "Māo", "Cat", "猫喜欢睡觉。", "Cats like to sleep."),
    w("鸟", "Niǎo", "Bird", "鸟在飞。", "Birds are flying."),
    w("熊猫", "Xióngmāo", "Panda", "熊猫很可爱。", "Pandas are cute."),
    w("鱼", "Yú", "Fish", "水里有鱼。", "There are fish in the water."),
    w("马", "Mǎ", "Horse", "他会骑马。", "He can ride a horse."),
    w("牛", "Niú", "Cow", "牛吃草。", "Cows eat grass."),
    w("动物", "Dòngwù", "Animal", "我喜欢小动物。", "I like small animals."),
    w("羊", "Yáng", "Sheep/Goat", "山上有羊。", "There are sheep on the mountain."),
    w("龙", "Lóng", "Dragon", "今年是龙年。", "This year is the Year of the Dragon."),
];

const COMMON_VERBS: &[RawWord] = &[
    w("吃", "Chī", "Eat", "你吃饭了吗？", "Have you eaten?"),
    w("喝", "Hē", "Drink", "喝水。", "Drink water."),
    w("看", "Kàn", "Look/See/Watch", "看电视。", "Watch TV."),
    w("听", "Tīng", "Listen", "听音乐。", "Listen to music."),
    w("说", "Shuō", "Speak", "请说中文。", "Please speak Chinese."),
    w("读", "Dú", "Read", "读书。", "Read a book."),
    w("写", "Xiě", "Write", "写名字。", "Write name."),
    w("坐", "Zuò", "Sit", "请坐。", "Please sit."),
    w("站", "Zhàn", "Stand", "站起来。", "Stand up."),
    w("走", "Zǒu", "Walk", "我们走吧。", "Let's go."),
    w("跑", "Pǎo", "Run", "他跑得很快。", "He runs fast."),
    w("想", "Xiǎng", "Think/Want", "我想去。", "I want to go."),
    w("做", "Zuò", "Do/Make", "你在做什么？", "What are you doing?"),
    w("玩", "Wán", "Play", "去玩游戏。", "Go play games."),
    w("学", "Xué", "Study", "学中文。", "Study Chinese."),
];

const FOOD_DRINK: &[RawWord] = &[
    w("水", "Shuǐ", "Water", "请给我一杯水。", "Please give me a glass of water."),
    w("茶", "Chá", "Tea", "中国人喜欢喝茶。", "Chinese people like to drink tea."),
    w("咖啡", "Kāfēi", "Coffee", "我要一杯热咖啡。", "I want a cup of hot coffee."),
    w("米饭", "Mǐfàn", "Rice (cooked)", "我不喜欢吃米饭。", "I don't like eating rice."),
    w("面条", "Miàntiáo", "Noodles", "这碗面条很好吃。", "This bowl of noodles is delicious."),
    w("面包", "Miànbāo", "Bread", "早餐我吃面包。", "I eat bread for breakfast."),
    w("牛奶", "Niúnǎi", "Milk", "睡觉前喝牛奶。", "Drink milk before sleep."),
    w("鸡蛋", "Jīdàn", "Egg", "我要两个鸡蛋。", "I want two eggs."),
    w("菜", "Cài", "Dish / Vegetable", "这个菜很辣。", "This dish is very spicy."),
    w("好吃", "Hǎochī", "Delicious", "中国菜很好吃。", "Chinese food is delicious."),
    w("苹果", "Píngguǒ", "Apple", "一天一苹果。", "An apple a day."),
    w("香蕉", "Xiāngjiāo", "Banana", "猴子爱吃香蕉。", "Monkeys love bananas."),
    w("西瓜", "Xīguā", "Watermelon", "夏天吃西瓜。", "Eat watermelon in summer."),
    w("水果", "Shuǐguǒ", "Fruit", "多吃水果对身体好。", "Eating fruit is good for health."),
    w("牛肉", "Niúròu", "Beef", "我不吃牛肉。", "I don't eat beef."),
    w("鸡肉", "Jīròu", "Chicken meat", "鸡肉很便宜。", "Chicken is cheap."),
    w("猪肉", "Zhūròu", "Pork", "这是猪肉饺子。", "These are pork dumplings."),
    w("啤酒", "Píjiǔ", "Beer", "我们要一瓶啤酒。", "We want a bottle of beer."),
    w("果汁", "Guǒzhī", "Juice", "我要橙汁。", "I want orange juice."),
    w("筷子", "Kuàizi", "Chopsticks", "你会用筷子吗？", "Can you use chopsticks?"),
    w("饭馆", "Fànguǎn", "Restaurant", "这家饭馆很有名。", "This restaurant is famous."),
    w("菜单", "Càidān", "Menu", "请给我菜单。", "Please give me the menu."),
    w("买单", "Mǎidān", "Pay the bill", "服务员，买单。", "Waiter, bill please."),
    w("火锅", "Huǒguō", "Hotpot", "我们去吃火锅吧。", "Let's go eat hotpot."),
    w("汤", "Tāng", "Soup", "我想喝汤。", "I want to drink soup."),
];

const TRAVEL_PLACES: &[RawWord] = &[
    w("去", "Qù", "To go", "我想去北京。", "I want to go to Beijing."),
    w("来", "Lái", "To come", "你什么时候来？", "When are you coming?"),
    w("中国", "Zhōngguó", "China", "中国很大。", "China is very big."),
    w("北京", "Běijīng", "Beijing", "北京是中国的首都。", "Beijing is the capital of China."),
    w("上海", "Shànghǎi", "Shanghai", "上海很现代。", "Shanghai is very modern."),
    w("飞机", "Fēijī", "Airplane", "我坐飞机去上海。", "I take a plane to Shanghai."),
    w("火车", "Huǒchē", "Train", "火车站很远。", "The train station is far."),
    w("出租车", "Chūzūchē", "Taxi", "我们可以坐出租车。", "We can take a taxi."),
    w("路", "Lù", "Road/Way", "我在路上。", "I am on the way."),
    w("酒店", "Jiǔdiàn", "Hotel", "这个酒店很贵。", "This hotel is expensive."),
    w("房间", "Fángjiān", "Room", "我要一个大房间。", "I want a big room."),
    w("地图", "Dìtú", "Map", "你看地图吗？", "Do you look at the map?"),
    w("洗手间", "Xǐshǒujiān", "Restroom", "洗手间在哪里？", "Where is the restroom?"),
    w("哪里", "Nǎlǐ", "Where", "你去哪里？", "Where are you going?"),
    w("这里", "Zhèlǐ", "Here", "这里很漂亮。", "Here is very beautiful."),
    w("那里", "Nàlǐ", "There", "那里的菜好吃。", "The food there is tasty."),
    w("护照", "Hùzhào", "Passport", "这是我的护照。", "This is my passport."),
    w("票", "Piào", "Ticket", "我要买一张票。", "I want to buy a ticket."),
    w("地铁", "Dìtiě", "Subway", "坐地铁很快。", "Taking the subway is fast."),
    w("公交车", "Gōngjiāochē", "Bus", "公交车人很多。", "The bus has many people."),
    w("机场", "Jīchǎng", "Airport", "我要去机场。", "I need to go to the airport."),
    w("公园", "Gōngyuán", "Park", "我们在公园跑步。", "We run in the park."),
];

const FAMILY_PEOPLE: &[RawWord] = &[
    w("爸爸", "Bàba", "Dad", "我爸爸是医生。", "My dad is a doctor."),
    w("妈妈", "Māma", "Mom", "我爱我的妈妈。", "I love my mom."),
    w("儿子", "Érzi", "Son", "他有一个儿子。", "He has a son."),
    w("女儿", "Nǚ'ér", "Daughter", "他的女儿很可爱。", "His daughter is cute."),
    w("老师", "Lǎoshī", "Teacher", "王老师很好。", "Teacher Wang is good."),
    w("学生", "Xuésheng", "Student", "我是大学生。", "I am a university student."),
    w("朋友", "Péngyou", "Friend", "我们是好朋友。", "We are good friends."),
    w("医生", "Yīshēng", "Doctor", "他在医院看医生。", "He is seeing a doctor at the hospital."),
    w("先生", "Xiānsheng", "Mr. / Husband", "王先生在吗？", "Is Mr. Wang here?"),
    w("小姐", "Xiǎojiě", "Miss", "李小姐你好。", "Hello, Miss Li."),
    w("人", "Rén", "Person", "你是哪里人？", "Where are you from?"),
    w("孩子", "Háizi", "Child", "孩子在玩。", "The child is playing."),
    w("男", "Nán", "Male", "那个男孩是谁？", "Who is that boy?"),
    w("女", "Nǚ", "Female", "她是我的女朋友。", "She is my girlfriend."),
    w("大家", "Dàjiā", "Everyone", "大家好。", "Hello everyone."),
    w("家人", "Jiārén", "Family member", "我和家人吃饭。", "I eat with family."),
    w("哥哥", "Gēge", "Older brother", "我没有哥哥。", "I don't have an older brother."),
    w("姐姐", "Jiějie", "Older sister", "姐姐比我大。", "Older sister is older than me."),
    w("弟弟", "Dìdi", "Younger brother", "弟弟在学校。", "Younger brother is at school."),
    w("妹妹", "Mèimei", "Younger sister", "妹妹喜欢唱歌。", "Younger sister likes singing."),
];

const DAILY_OBJECTS: &[RawWord] = &[
    w("书", "Shū", "Book", "我看书。", "I read a book."),
    w("手机", "Shǒujī", "Mobile phone", "你的手机在哪里？", "Where is your phone?"),
    w("电脑", "Diànnǎo", "Computer", "我用电脑工作。", "I use a computer to work."),
    w("杯子", "Bēizi", "Cup/Glass", "这个杯子很漂亮。", "This cup is beautiful."),
    w("桌子", "Zhuōzi", "Table", "书在桌子上。", "The book is on the table."),
    w("椅子", "Yǐzi", "Chair", "请坐椅子。", "Please sit on the chair."),
    w("衣服", "Yīfu", "Clothes", "我要买衣服。", "I want to buy clothes."),
    w("钱", "Qián", "Money", "我没有钱。", "I don't have money."),
    w("东西", "Dōngxi", "Thing", "这是什么东西？", "What is this thing?"),
    w("家", "Jiā", "Home/Family", "我想回家。", "I want to go home."),
    w("学校", "Xuéxiào", "School", "学校很大。", "The school is big."),
    w("商店", "Shāngdiàn", "Store", "商店关门了。", "The store is closed."),
    w("医院", "Yīyuàn", "Hospital", "他在医院。", "He is in the hospital."),
    w("工作", "Gōngzuò", "Job/Work", "你的工作是什么？", "What is your job?"),
    w("笔", "Bǐ", "Pen", "我有一支笔。", "I have a pen."),
    w("包", "Bāo", "Bag", "这是我的包。", "This is my bag."),
    w("床", "Chuáng", "Bed", "我在床上。", "I am on the bed."),
    w("门", "Mén", "Door", "请关门。", "Please close the door."),
    w("窗户", "Chuānghu", "Window", "打开窗户。", "Open the window."),
    w("灯", "Dēng", "Light", "关灯。", "Turn off the light."),
];

const ADJECTIVES_COLORS: &[RawWord] = &[
    w("爱", "Ài", "Love", "我爱你。", "I love you."),
    w("喜欢", "Xǐhuan", "Like", "我喜欢你。", "I like you."),
    w("累", "Lèi", "Tired", "我很累。", "I am very tired."),
    w("忙", "Máng", "Busy", "今天很忙。", "Today is busy."),
    w("漂亮", "Piàoliang", "Beautiful", "她很漂亮。", "She is beautiful."),
    w("帅", "Shuài", "Handsome", "他很帅。", "He is handsome."),
    w("热", "Rè", "Hot", "天气很热。", "The weather is hot."),
    w("冷", "Lěng", "Cold", "我不冷。", "I am not cold."),
    w("大", "Dà", "Big", "这个苹果很大。", "This apple is big."),
    w("小", "Xiǎo", "Small", "这个房间很小。", "This room is small."),
    w("多", "Duō", "Many/Much", "人很多。", "Many people."),
    w("少", "Shǎo", "Few/Little", "钱很少。", "Little money."),
    w("新", "Xīn", "New", "新衣服。", "New clothes."),
    w("旧", "Jiù", "Old", "旧书。", "Old book."),
    w("红", "Hóng", "Red", "红色的车。", "Red car."),
    w("白", "Bái", "White", "白色的云。", "White clouds."),
    w("黑", "Hēi", "Black", "黑色的狗。", "Black dog."),
    w("蓝", "Lán", "Blue", "蓝天。", "Blue sky."),
    w("绿", "Lǜ", "Green", "绿茶。", "Green tea."),
    w("黄", "Huáng", "Yellow", "黄色的花。", "Yellow flower."),
    w("快乐", "Kuàilè", "Happy", "生日快乐。", "Happy birthday."),
    w("难", "Nán", "Difficult", "中文很难。", "Chinese is difficult."),
    w("容易", "Róngyì", "Easy", "这很容易。", "This is easy."),
    w("干净", "Gānjìng", "Clean", "房间很干净。", "The room is clean."),
];

const SHOPPING_MONEY: &[RawWord] = &[
    w("买", "Mǎi", "Buy", "我要买这个。", "I want to buy this."),
    w("卖", "Mài", "Sell", "这里卖水果吗？", "Do you sell fruit here?"),
    w("贵", "Guì", "Expensive", "太贵了！", "Too expensive!"),
    w("便宜", "Piányi", "Cheap", "便宜一点吧。", "Make it a bit cheaper."),
    w("多少钱", "Duōshao qián", "How much money", "这个多少钱？", "How much is this?"),
    w("现金", "Xiànjīn", "Cash", "我付现金。", "I pay cash."),
    w("信用卡", "Xìnyòngkǎ", "Credit card", "可以刷信用卡吗？", "Can I swipe a credit card?"),
    w("超市", "Chāoshì", "Supermarket", "我去超市买东西。", "I go to the supermarket to buy things."),
    w("袋子", "Dàizi", "Bag", "要袋子吗？", "Do you want a bag?"),
    w("试", "Shì", "Try", "我可以试一下吗？", "Can I try it?"),
];

const WEATHER_NATURE: &[RawWord] = &[
    w("天", "Tiān", "Sky/Day", "天很蓝。", "The sky is very blue."),
    w("下雨", "Xiàyǔ", "Rain", "今天下雨。", "It is raining today."),
    w("下雪", "Xiàxuě", "Snow", "冬天下雪。", "It snows in winter."),
    w("风", "Fēng", "Wind", "风很大。", "The wind is strong."),
    w("太阳", "Tàiyáng", "Sun", "太阳出来了。", "The sun came out."),
    w("月亮", "Yuèliang", "Moon", "月亮很圆。", "The moon is round."),
    w("树", "Shù", "Tree", "那是一棵树。", "That is a tree."),
    w("花", "Huā", "Flower", "花很香。", "The flower smells good."),
    w("山", "Shān", "Mountain", "我们去爬山。", "We go climb the mountain."),
    w("河", "Hé", "River", "河水很清。", "The river water is clear."),
];

const EMERGENCY_HEALTH: &[RawWord] = &[
    w("救命", "Jiùmìng", "Help!", "救命啊！", "Help!"),
    w("警察", "Jǐngchá", "Police", "叫警察。", "Call the police."),
    w("危险", "Wēixiǎn", "Dangerous", "这里很危险。", "Here is very dangerous."),
    w("疼", "Téng", "Pain/Hurt", "我的头很疼。", "My head hurts."),
    w("药", "Yào", "Medicine", "吃药了吗？", "Have you taken medicine?"),
    w("发烧", "Fāshāo", "Fever", "我发烧了。", "I have a fever."),
    w("感冒", "Gǎnmào", "Cold (illness)", "他感冒了。", "He has a cold."),
    w("小心", "Xiǎoxīn", "Be careful", "过马路要小心。", "Be careful crossing the road."),
    w("停", "Tíng", "Stop", "停车！", "Stop the car!"),
    w("问题", "Wèntí", "Question/Problem", "我有一个问题。", "I have a question."),
];

static LESSONS: LazyLock<Vec<Lesson>> = LazyLock::new(|| {
    vec![
        // Beginner
        vocabulary_lesson(
            "Greetings & Essentials",
            "Start here: Hello, Thank you, and basics.",
            Level::Beginner,
            GREETINGS_ESSENTIALS,
        ),
        vocabulary_lesson(
            "Numbers & Time",
            "Count to ten and tell the time.",
            Level::Beginner,
            NUMBERS_TIME,
        ),
        vocabulary_lesson(
            "Family & People",
            "Talking about family and people.",
            Level::Beginner,
            FAMILY_PEOPLE,
        ),
        vocabulary_lesson(
            "Body & Health",
            "Parts of the body and feeling sick.",
            Level::Beginner,
            BODY_HEALTH,
        ),
        vocabulary_lesson(
            "Common Verbs",
            "Action words you need to know.",
            Level::Beginner,
            COMMON_VERBS,
        ),
        // Intermediate
        vocabulary_lesson(
            "Food & Drink",
            "Ordering food and naming ingredients.",
            Level::Intermediate,
            FOOD_DRINK,
        ),
        vocabulary_lesson(
            "Daily Objects",
            "Common objects you use every day.",
            Level::Intermediate,
            DAILY_OBJECTS,
        ),
        vocabulary_lesson(
            "Adjectives & Colors",
            "Express yourself and describe things.",
            Level::Intermediate,
            ADJECTIVES_COLORS,
        ),
        vocabulary_lesson(
            "Shopping & Money",
            "Bargaining and buying things.",
            Level::Intermediate,
            SHOPPING_MONEY,
        ),
        vocabulary_lesson(
            "Animals",
            "Pets and wild animals.",
            Level::Intermediate,
            ANIMALS,
        ),
        // Advanced
        vocabulary_lesson(
            "Travel & Places",
            "Getting around China like a pro.",
            Level::Advanced,
            TRAVEL_PLACES,
        ),
        vocabulary_lesson(
            "Weather & Nature",
            "Talking about the environment.",
            Level::Advanced,
            WEATHER_NATURE,
        ),
        vocabulary_lesson(
            "Emergency & Safety",
            "Important words for safety.",
            Level::Advanced,
            EMERGENCY_HEALTH,
        ),
        // Dialogues
        dialogue_lesson(
            "Ordering Coffee",
            "A daily conversation at a cafe.",
            Level::Beginner,
            "d1",
            "At the Cafe",
            &[
                (Speaker::A, "你好，我要一杯拿铁。", "Nǐ hǎo, wǒ yào yībēi nátiě.", "Hello, I would like a latte."),
                (Speaker::B, "好的，要热的还是冰的？", "Hǎode, yào rè de háishì bīng de?", "Okay, hot or iced?"),
                (Speaker::A, "要冰的，谢谢。", "Yào bīng de, xièxie.", "Iced, thank you."),
                (Speaker::B, "一共三十块。", "Yígòng sānshí kuài.", "That will be 30 yuan in total."),
            ],
        ),
        dialogue_lesson(
            "Asking Directions",
            "How to find the subway station.",
            Level::Intermediate,
            "d2",
            "Where is the Subway?",
            &[
                (Speaker::A, "请问，地铁站在哪里？", "Qǐngwèn, dìtiě zhàn zài nǎlǐ?", "Excuse me, where is the subway station?"),
                (Speaker::B, "一直走，然后向右转。", "Yìzhí zǒu, ránhòu xiàng yòu zhuǎn.", "Go straight, then turn right."),
                (Speaker::A, "远吗？", "Yuǎn ma?", "Is it far?"),
                (Speaker::B, "不远，走路五分钟。", "Bù yuǎn, zǒulù wǔ fēnzhōng.", "Not far, 5 minutes walk."),
            ],
        ),
        // Quizzes
        quiz_lesson(
            "Basic Grammar Quiz",
            "Test your knowledge on sentence structure.",
            Level::Beginner,
            &[
                (
                    "Which is the correct way to say \"I am American\"?",
                    &[
                        "我是美国人 (Wǒ shì Měiguórén)",
                        "我美国人是 (Wǒ Měiguórén shì)",
                        "是我是美国人 (Shì wǒ shì Měiguórén)",
                        "美国人是我 (Měiguórén shì wǒ)",
                    ],
                    0,
                    "The structure is Subject + 是 (verb to be) + Noun.",
                ),
                (
                    "How do you ask \"How are you?\"",
                    &[
                        "你叫什么？ (Nǐ jiào shénme?)",
                        "你好吗？ (Nǐ hǎo ma?)",
                        "这是什么？ (Zhè shì shénme?)",
                        "哪怕？ (Nǎ pà?)",
                    ],
                    1,
                    "\"吗\" (ma) is a particle used at the end of a sentence to turn a statement into a yes/no question.",
                ),
                (
                    "Translate: \"He is not busy.\"",
                    &[
                        "他不忙 (Tā bù máng)",
                        "他没忙 (Tā méi máng)",
                        "他非忙 (Tā fēi máng)",
                        "不他忙 (Bù tā máng)",
                    ],
                    0,
                    "Use \"不\" (bù) to negate adjectives and present/future verbs.",
                ),
            ],
        ),
        quiz_lesson(
            "Vocabulary Challenge",
            "Test your word knowledge.",
            Level::Intermediate,
            &[
                (
                    "What is \"Airplane\" in Chinese?",
                    &["手机 (Shǒujī)", "飞机 (Fēijī)", "司机 (Sījī)", "电视 (Diànshì)"],
                    1,
                    "Fei (Fly) + Ji (Machine) = Airplane.",
                ),
                (
                    "Which word means \"Delicious\"?",
                    &["好喝 (Hǎohē)", "好看 (Hǎokàn)", "好吃 (Hǎochī)", "好听 (Hǎotīng)"],
                    2,
                    "Chi means eat. Haochi means \"good to eat\".",
                ),
            ],
        ),
    ]
});

type RawLine = (Speaker, &'static str, &'static str, &'static str);
type RawQuestion = (&'static str, &'static [&'static str], usize, &'static str);

/// "Greetings & Essentials" -> "greetings-essentials"
fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn vocabulary_lesson(title: &str, description: &str, level: Level, words: &[RawWord]) -> Lesson {
    let id = slugify(title);
    let content = words
        .iter()
        .enumerate()
        .map(|(index, raw)| Word {
            id: format!("{}-{}", id, index + 1),
            hanzi: raw.hanzi.to_string(),
            pinyin: raw.pinyin.to_string(),
            meaning: raw.meaning.to_string(),
            example_sentence: raw.example_sentence.to_string(),
            example_meaning: raw.example_meaning.to_string(),
        })
        .collect();

    Lesson {
        id,
        title: title.to_string(),
        description: description.to_string(),
        level,
        is_locked: false,
        content: LessonContent::VocabularyList(content),
    }
}

fn dialogue_lesson(
    title: &str,
    description: &str,
    level: Level,
    dialogue_id: &str,
    dialogue_title: &str,
    lines: &[RawLine],
) -> Lesson {
    let lines = lines
        .iter()
        .map(|(speaker, hanzi, pinyin, meaning)| DialogueLine {
            speaker: *speaker,
            hanzi: hanzi.to_string(),
            pinyin: pinyin.to_string(),
            meaning: meaning.to_string(),
            avatar: match speaker {
                Speaker::A => FELIX_AVATAR,
                Speaker::B => ANEKA_AVATAR,
            }
            .to_string(),
        })
        .collect();

    Lesson {
        id: slugify(title),
        title: title.to_string(),
        description: description.to_string(),
        level,
        is_locked: false,
        content: LessonContent::DialogueScript(Dialogue {
            id: dialogue_id.to_string(),
            title: dialogue_title.to_string(),
            lines,
        }),
    }
}

fn quiz_lesson(title: &str, description: &str, level: Level, questions: &[RawQuestion]) -> Lesson {
    let id = slugify(title);
    let content = questions
        .iter()
        .enumerate()
        .map(|(index, (question, options, correct_answer, explanation))| QuizQuestion {
            id: format!("{}-q{}", id, index + 1),
            question: question.to_string(),
            options: options.iter().map(|option| option.to_string()).collect(),
            correct_answer: *correct_answer,
            explanation: explanation.to_string(),
        })
        .collect();

    Lesson {
        id,
        title: title.to_string(),
        description: description.to_string(),
        level,
        is_locked: false,
        content: LessonContent::QuizQuestionSet(content),
    }
}

pub struct HardcodedLessonRepository;

impl HardcodedLessonRepository {
    pub fn new() -> Self {
        // Verify data integrity at construction time
        let mut ids = HashSet::new();
        for lesson in LESSONS.iter() {
            debug_assert!(ids.insert(&lesson.id), "Duplicate lesson id {}", lesson.id);

            if let LessonContent::QuizQuestionSet(questions) = &lesson.content {
                for question in questions {
                    debug_assert!(
                        question.correct_answer < question.options.len(),
                        "Question {} points past its options",
                        question.id
                    );
                }
            }
        }

        Self
    }
}

impl LessonRepository for HardcodedLessonRepository {
    fn get_all_lessons(&self) -> Vec<Lesson> {
        LESSONS.clone()
    }

    fn find_by_id(&self, lesson_id: &str) -> Option<Lesson> {
        LESSONS.iter().find(|lesson| lesson.id == lesson_id).cloned()
    }
}

impl Default for HardcodedLessonRepository {
    fn default() -> Self {
        Self::new()
    }
}
